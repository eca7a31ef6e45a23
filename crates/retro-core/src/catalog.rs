//! Launch catalog: the ordered list of menu cards.
//!
//! Two built-in apps come first, then the embeddable games, then a block of
//! "bootleg cartridge" placeholders that cannot be launched. Order defines
//! navigation adjacency on the menu grid.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;

/// Where activating a catalog item leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// The AI terminal.
    Chat,
    /// The music studio.
    Music,
    /// An external game, handed to the embed surface.
    Embed(String),
    /// Placeholder; activating it does nothing.
    Unavailable,
}

impl LaunchTarget {
    const CHAT: &str = "internal:chat";
    const MUSIC: &str = "internal:music";
    const UNAVAILABLE: &str = "unavailable";

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat => f.write_str(Self::CHAT),
            Self::Music => f.write_str(Self::MUSIC),
            Self::Embed(url) => f.write_str(url),
            Self::Unavailable => f.write_str(Self::UNAVAILABLE),
        }
    }
}

impl FromStr for LaunchTarget {
    type Err = std::convert::Infallible;

    /// Sentinels map to their variants; anything else is an embed locator.
    /// `about:blank` and the empty string count as unavailable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            Self::CHAT => Self::Chat,
            Self::MUSIC => Self::Music,
            Self::UNAVAILABLE | "about:blank" | "" => Self::Unavailable,
            url => Self::Embed(url.to_string()),
        })
    }
}

/// One card on the menu grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub category: String,
    pub year: String,
    /// Short ASCII token drawn as the card's thumbnail.
    pub glyph: String,
    pub description: String,
    pub launch_target: LaunchTarget,
}

impl CatalogItem {
    /// Apps get a highlighted category label on their card.
    pub fn is_app(&self) -> bool {
        matches!(self.launch_target, LaunchTarget::Chat | LaunchTarget::Music)
    }
}

struct BuiltinEntry {
    id: &'static str,
    title: &'static str,
    category: &'static str,
    year: &'static str,
    glyph: &'static str,
    target: &'static str,
    description: &'static str,
}

const BUILTIN: &[BuiltinEntry] = &[
    BuiltinEntry {
        id: "app-chat",
        title: "AI TERMINAL",
        category: "SYSTEM",
        year: "2024",
        glyph: "[AI]",
        target: "internal:chat",
        description: "Neural Network Interface.",
    },
    BuiltinEntry {
        id: "app-music",
        title: "MUSIC STUDIO",
        category: "MEDIA",
        year: "1995",
        glyph: "d(^_^)b",
        target: "internal:music",
        description: "Audio Visualizer.",
    },
    BuiltinEntry {
        id: "contra",
        title: "Contra",
        category: "ACT",
        year: "1987",
        glyph: "=>--",
        target: "https://www.retrogames.cc/embed/16885-contra-usa.html",
        description: "UP UP DOWN DOWN LEFT RIGHT...",
    },
    BuiltinEntry {
        id: "mario",
        title: "Super Mario Bros",
        category: "RPG",
        year: "1985",
        glyph: "(M)",
        target: "https://www.retrogames.cc/embed/16879-super-mario-bros-world.html",
        description: "It's me, Mario!",
    },
    BuiltinEntry {
        id: "tank",
        title: "Battle City",
        category: "STG",
        year: "1985",
        glyph: "[#]=",
        target: "https://www.retrogames.cc/embed/16664-battle-city-japan.html",
        description: "Protect the Eagle base.",
    },
    BuiltinEntry {
        id: "adventure",
        title: "Adventure Island",
        category: "ACT",
        year: "1986",
        glyph: "~o~",
        target: "https://www.retrogames.cc/embed/16726-hudson-s-adventure-island-usa.html",
        description: "Eat fruit, throw hammers.",
    },
    BuiltinEntry {
        id: "twinbee",
        title: "Twin Bee",
        category: "STG",
        year: "1986",
        glyph: "<o>",
        target: "https://www.retrogames.cc/embed/17182-twin-bee-japan.html",
        description: "Shoot the bells!",
    },
    BuiltinEntry {
        id: "circus",
        title: "Circus Charlie",
        category: "ACT",
        year: "1984",
        glyph: "/^\\",
        target: "https://www.retrogames.cc/embed/17528-circus-charlie-japan.html",
        description: "Jump through fire rings.",
    },
    BuiltinEntry {
        id: "kage",
        title: "Legend of Kage",
        category: "ACT",
        year: "1985",
        glyph: "-x-",
        target: "https://www.retrogames.cc/embed/17498-legend-of-kage-the-usa.html",
        description: "Rescue the princess.",
    },
    BuiltinEntry {
        id: "ice",
        title: "Ice Climber",
        category: "ACT",
        year: "1985",
        glyph: "T",
        target: "https://www.retrogames.cc/embed/16912-ice-climber-japan-usa.html",
        description: "Climb the infinite mountain.",
    },
    BuiltinEntry {
        id: "bomberman",
        title: "Bomberman",
        category: "PZL",
        year: "1983",
        glyph: "(*)",
        target: "https://www.retrogames.cc/embed/16676-bomberman-usa.html",
        description: "Explosions everywhere.",
    },
    BuiltinEntry {
        id: "galaga",
        title: "Galaga",
        category: "STG",
        year: "1981",
        glyph: "/A\\",
        target: "https://www.retrogames.cc/embed/16901-galaga-demons-of-death-usa.html",
        description: "Space fighter classic.",
    },
    BuiltinEntry {
        id: "pacman",
        title: "Pac-Man",
        category: "ARC",
        year: "1980",
        glyph: "C ..",
        target: "https://www.retrogames.cc/embed/17142-pac-man-usa.html",
        description: "Waka waka waka.",
    },
    BuiltinEntry {
        id: "tetris",
        title: "Tetris",
        category: "PZL",
        year: "1984",
        glyph: "[][]",
        target: "https://www.retrogames.cc/embed/17300-tetris-usa.html",
        description: "Line up the blocks.",
    },
    BuiltinEntry {
        id: "mappy",
        title: "Mappy",
        category: "ACT",
        year: "1983",
        glyph: "<:3",
        target: "https://www.retrogames.cc/embed/17062-mappy-japan.html",
        description: "Police mouse vs cats.",
    },
    BuiltinEntry {
        id: "city",
        title: "City Connection",
        category: "ACT",
        year: "1985",
        glyph: "o=o",
        target: "https://www.retrogames.cc/embed/16881-city-connection-usa.html",
        description: "Paint the roads white.",
    },
    BuiltinEntry {
        id: "doom",
        title: "DOOM",
        category: "FPS",
        year: "1993",
        glyph: ">:E",
        target: "https://dos.zone/player/?bundleUrl=https%3A%2F%2Fcdn.dos.zone%2Fcustom%2Fdos%2Fdoom.jsdos?anonymous=1",
        description: "Knee-deep in the dead.",
    },
    BuiltinEntry {
        id: "wolf3d",
        title: "Wolfenstein 3D",
        category: "FPS",
        year: "1992",
        glyph: "|^|^|",
        target: "https://dos.zone/player/?bundleUrl=https%3A%2F%2Fcdn.dos.zone%2Fcustom%2Fdos%2Fwolf3d.jsdos?anonymous=1",
        description: "Grandfather of FPS.",
    },
    BuiltinEntry {
        id: "pop",
        title: "Prince of Persia",
        category: "ACT",
        year: "1989",
        glyph: "-|--",
        target: "https://dos.zone/player/?bundleUrl=https%3A%2F%2Fcdn.dos.zone%2Fcustom%2Fdos%2Fpop.jsdos?anonymous=1",
        description: "Time is running out.",
    },
];

const BOOTLEG_TITLES: &[&str] = &[
    "Super Mario 4",
    "Contra 7",
    "Tank 1999",
    "Adventure X",
    "Tetris 2",
    "Hyper Olympics",
    "Star Fighter",
    "Galaxian 8",
];

const BOOTLEG_GLYPHS: &[&str] = &["[=]", "[oo]", "(+)", "o|"];

/// Immutable, ordered item list built once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// The two apps and the embeddable games, without placeholders.
    pub fn builtin() -> Self {
        let items = BUILTIN
            .iter()
            .map(|e| CatalogItem {
                id: e.id.to_string(),
                title: e.title.to_string(),
                category: e.category.to_string(),
                year: e.year.to_string(),
                glyph: e.glyph.to_string(),
                description: e.description.to_string(),
                launch_target: e.target.parse().unwrap_or(LaunchTarget::Unavailable),
            })
            .collect();
        Self { items }
    }

    /// Built-in items followed by `count` bootleg placeholders.
    ///
    /// Titles and glyphs are drawn from `rng`; ids, count and every other
    /// field depend only on `count`.
    pub fn with_placeholders(count: usize, rng: &mut impl Rng) -> Self {
        let mut catalog = Self::builtin();
        catalog.items.reserve(count);
        for i in 1..=count {
            let base = BOOTLEG_TITLES.choose(rng).copied().unwrap_or("Bootleg");
            let glyph = BOOTLEG_GLYPHS.choose(rng).copied().unwrap_or("[?]");
            catalog.items.push(CatalogItem {
                id: format!("bootleg-{i}"),
                title: format!("{base} V{i}"),
                category: "UNK".to_string(),
                year: "19XX".to_string(),
                glyph: glyph.to_string(),
                description: "READ ERROR: INSERT CARTRIDGE".to_string(),
                launch_target: LaunchTarget::Unavailable,
            });
        }
        log::debug!("Catalog built: {} items ({count} placeholders)", catalog.len());
        catalog
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }
}
