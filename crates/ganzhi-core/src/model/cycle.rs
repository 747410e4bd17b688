//! Heavenly stems, earthly branches and the attribute tables attached to them.
//!
//! These tables are fixed facts of the cycle rather than catalog data, so they
//! live in code and are never supplied by a data provider.

labeled_enum! {
    /// The Five Elements (五行).
    pub enum Element ("element") {
        Wood => "木" | "wood",
        Fire => "火" | "fire",
        Earth => "土" | "earth",
        Metal => "金" | "metal",
        Water => "水" | "water",
    }
}

impl Element {
    /// The element this one generates (木生火, 火生土, 土生金, 金生水, 水生木).
    #[must_use]
    pub const fn generates(self) -> Self {
        match self {
            Self::Wood => Self::Fire,
            Self::Fire => Self::Earth,
            Self::Earth => Self::Metal,
            Self::Metal => Self::Water,
            Self::Water => Self::Wood,
        }
    }

    /// The element this one controls (木克土, 土克水, 水克火, 火克金, 金克木).
    #[must_use]
    pub const fn controls(self) -> Self {
        match self {
            Self::Wood => Self::Earth,
            Self::Earth => Self::Water,
            Self::Water => Self::Fire,
            Self::Fire => Self::Metal,
            Self::Metal => Self::Wood,
        }
    }
}

labeled_enum! {
    /// Yin/yang polarity.
    pub enum Polarity ("polarity") {
        Yang => "阳" | "yang",
        Yin => "阴" | "yin",
    }
}

labeled_enum! {
    /// Compass direction associated with a branch.
    pub enum Direction ("direction") {
        North => "北" | "north",
        NorthEast => "东北" | "northeast",
        East => "东" | "east",
        SouthEast => "东南" | "southeast",
        South => "南" | "south",
        SouthWest => "西南" | "southwest",
        West => "西" | "west",
        NorthWest => "西北" | "northwest",
    }
}

labeled_enum! {
    /// Season associated with a branch.
    pub enum Season ("season") {
        Spring => "春" | "spring",
        Summer => "夏" | "summer",
        Autumn => "秋" | "autumn",
        Winter => "冬" | "winter",
    }
}

labeled_enum! {
    /// The ten heavenly stems (天干), in cycle order.
    pub enum Stem ("stem") {
        Jia => "甲" | "jia",
        Yi => "乙" | "yi",
        Bing => "丙" | "bing",
        Ding => "丁" | "ding",
        Wu => "戊" | "wu",
        Ji => "己" | "ji",
        Geng => "庚" | "geng",
        Xin => "辛" | "xin",
        Ren => "壬" | "ren",
        Gui => "癸" | "gui",
    }
}

impl Stem {
    /// Stems pair up by element: 甲乙 wood, 丙丁 fire, and so on.
    #[must_use]
    pub const fn element(self) -> Element {
        match self {
            Self::Jia | Self::Yi => Element::Wood,
            Self::Bing | Self::Ding => Element::Fire,
            Self::Wu | Self::Ji => Element::Earth,
            Self::Geng | Self::Xin => Element::Metal,
            Self::Ren | Self::Gui => Element::Water,
        }
    }

    /// Even positions are yang, odd positions yin.
    #[must_use]
    pub const fn polarity(self) -> Polarity {
        if self.index() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }
}

labeled_enum! {
    /// The twelve earthly branches (地支), in cycle order.
    pub enum Branch ("branch") {
        Zi => "子" | "zi",
        Chou => "丑" | "chou",
        Yin => "寅" | "yin",
        Mao => "卯" | "mao",
        Chen => "辰" | "chen",
        Si => "巳" | "si",
        Wu => "午" | "wu",
        Wei => "未" | "wei",
        Shen => "申" | "shen",
        You => "酉" | "you",
        Xu => "戌" | "xu",
        Hai => "亥" | "hai",
    }
}

impl Branch {
    #[must_use]
    pub const fn element(self) -> Element {
        match self {
            Self::Zi | Self::Hai => Element::Water,
            Self::Yin | Self::Mao => Element::Wood,
            Self::Si | Self::Wu => Element::Fire,
            Self::Shen | Self::You => Element::Metal,
            Self::Chou | Self::Chen | Self::Wei | Self::Xu => Element::Earth,
        }
    }

    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Zi => Direction::North,
            Self::Chou | Self::Yin => Direction::NorthEast,
            Self::Mao => Direction::East,
            Self::Chen | Self::Si => Direction::SouthEast,
            Self::Wu => Direction::South,
            Self::Wei | Self::Shen => Direction::SouthWest,
            Self::You => Direction::West,
            Self::Xu | Self::Hai => Direction::NorthWest,
        }
    }

    #[must_use]
    pub const fn season(self) -> Season {
        match self {
            Self::Yin | Self::Mao | Self::Chen => Season::Spring,
            Self::Si | Self::Wu | Self::Wei => Season::Summer,
            Self::Shen | Self::You | Self::Xu => Season::Autumn,
            Self::Hai | Self::Zi | Self::Chou => Season::Winter,
        }
    }

    /// Lunar month governed by the branch; 寅 opens the year.
    #[must_use]
    pub const fn month(self) -> &'static str {
        match self {
            Self::Yin => "正月",
            Self::Mao => "二月",
            Self::Chen => "三月",
            Self::Si => "四月",
            Self::Wu => "五月",
            Self::Wei => "六月",
            Self::Shen => "七月",
            Self::You => "八月",
            Self::Xu => "九月",
            Self::Hai => "十月",
            Self::Zi => "十一月",
            Self::Chou => "十二月",
        }
    }
}

/// A stem may only pair with a branch of the same parity.
#[must_use]
pub const fn pairs_with(stem: Stem, branch: Branch) -> bool {
    stem.index() % 2 == branch.index() % 2
}
