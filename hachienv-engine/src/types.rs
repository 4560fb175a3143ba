use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of players in a round. Hachi-hachi is played three-handed.
pub const NP: usize = 3;

/// Total physical cards in a hanafuda deck: 12 months x 4 cards.
pub const DECK_SIZE: usize = 48;

/// Cards dealt to each hand.
pub const HAND_SIZE: usize = 8;

/// Cards dealt face-up to the field.
pub const FIELD_SIZE: usize = 8;

/// Total card points in the deck: 5x20 + 9x10 + 10x5 + 24x1.
pub const TOTAL_POINTS: i32 = 264;

/// Break-even card-point total per player (264 / 3). The game's namesake.
pub const PAR_POINTS: i32 = 88;

// Named card ids for readability. id = (month - 1) * 4 + slot.
pub const CRANE: u8 = 0;
pub const CURTAIN: u8 = 8;
pub const MOON: u8 = 28;
pub const RAIN_MAN: u8 = 40;
pub const PHOENIX: u8 = 44;

/// Brights whose presence on the dealt field makes the round a grand field (4x).
pub const GRAND_BRIGHTS: [u8; 2] = [RAIN_MAN, PHOENIX];

/// Brights whose presence on the dealt field makes the round a large field (2x).
pub const LARGE_BRIGHTS: [u8; 3] = [CRANE, CURTAIN, MOON];

/// The three poetry ribbons (pine, plum, cherry).
pub const POETRY_RIBBONS: [u8; 3] = [1, 5, 9];

/// The three blue ribbons (peony, chrysanthemum, maple).
pub const BLUE_RIBBONS: [u8; 3] = [21, 33, 37];

/// The willow ribbon, excluded from the seven-ribbon set.
pub const WILLOW_RIBBON: u8 = 42;

/// The four point categories of hanafuda cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Bright = 0,
    Animal = 1,
    Ribbon = 2,
    Chaff = 3,
}

impl CardKind {
    /// Card-point value of this category under hachi-hachi counting.
    #[inline]
    pub const fn points(self) -> i32 {
        match self {
            CardKind::Bright => 20,
            CardKind::Animal => 10,
            CardKind::Ribbon => 5,
            CardKind::Chaff => 1,
        }
    }
}

// Category of each card id 0-47, month-major. Slot 0 carries the month's
// special card, slot 1 its second-rank card, the rest are chaff. August and
// November carry two specials; December is bright plus three chaff.
const KIND_TABLE: [CardKind; DECK_SIZE] = {
    use CardKind::{Animal, Bright, Chaff, Ribbon};
    [
        Bright, Ribbon, Chaff, Chaff, // 1  pine
        Animal, Ribbon, Chaff, Chaff, // 2  plum
        Bright, Ribbon, Chaff, Chaff, // 3  cherry
        Animal, Ribbon, Chaff, Chaff, // 4  wisteria
        Animal, Ribbon, Chaff, Chaff, // 5  iris
        Animal, Ribbon, Chaff, Chaff, // 6  peony
        Animal, Ribbon, Chaff, Chaff, // 7  bush clover
        Bright, Animal, Chaff, Chaff, // 8  pampas
        Animal, Ribbon, Chaff, Chaff, // 9  chrysanthemum
        Animal, Ribbon, Chaff, Chaff, // 10 maple
        Bright, Animal, Ribbon, Chaff, // 11 willow
        Bright, Chaff, Chaff, Chaff, // 12 paulownia
    ]
};

const NAME_TABLE: [&str; DECK_SIZE] = [
    "Crane",
    "Pine Poetry Ribbon",
    "Pine Chaff",
    "Pine Chaff",
    "Bush Warbler",
    "Plum Poetry Ribbon",
    "Plum Chaff",
    "Plum Chaff",
    "Curtain",
    "Cherry Poetry Ribbon",
    "Cherry Chaff",
    "Cherry Chaff",
    "Cuckoo",
    "Wisteria Ribbon",
    "Wisteria Chaff",
    "Wisteria Chaff",
    "Eight-Plank Bridge",
    "Iris Ribbon",
    "Iris Chaff",
    "Iris Chaff",
    "Butterflies",
    "Peony Blue Ribbon",
    "Peony Chaff",
    "Peony Chaff",
    "Boar",
    "Clover Ribbon",
    "Clover Chaff",
    "Clover Chaff",
    "Moon",
    "Geese",
    "Pampas Chaff",
    "Pampas Chaff",
    "Sake Cup",
    "Chrysanthemum Blue Ribbon",
    "Chrysanthemum Chaff",
    "Chrysanthemum Chaff",
    "Deer",
    "Maple Blue Ribbon",
    "Maple Chaff",
    "Maple Chaff",
    "Rain Man",
    "Swallow",
    "Willow Ribbon",
    "Lightning",
    "Phoenix",
    "Paulownia Chaff",
    "Paulownia Chaff",
    "Paulownia Chaff",
];

/// A single hanafuda card, identified by its id in 0..48.
///
/// `month() = id / 4 + 1`; the card's category and display name come from
/// static tables. Identity is the id; month drives matching; category drives
/// card points.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card(u8);

impl Card {
    /// Creates a `Card` if `id` is in range 0..48.
    #[inline]
    pub const fn new(id: u8) -> Option<Self> {
        if id < DECK_SIZE as u8 {
            Some(Card(id))
        } else {
            None
        }
    }

    /// Raw numeric id (0-47).
    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Month of this card, 1-12.
    #[inline]
    pub const fn month(self) -> u8 {
        self.0 / 4 + 1
    }

    #[inline]
    pub const fn kind(self) -> CardKind {
        KIND_TABLE[self.0 as usize]
    }

    /// Card-point value (20/10/5/1 by category).
    #[inline]
    pub const fn points(self) -> i32 {
        self.kind().points()
    }

    pub const fn name(self) -> &'static str {
        NAME_TABLE[self.0 as usize]
    }

    #[inline]
    pub const fn is_bright(self) -> bool {
        matches!(self.kind(), CardKind::Bright)
    }

    #[inline]
    pub const fn is_ribbon(self) -> bool {
        matches!(self.kind(), CardKind::Ribbon)
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({}, {})", self.0, self.name())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every card of the deck in id order.
pub fn full_deck() -> Vec<Card> {
    (0..DECK_SIZE as u8).map(Card).collect()
}

/// Sum of card points over a set of cards.
pub fn card_points(cards: &[Card]) -> i32 {
    cards.iter().map(|c| c.points()).sum()
}

/// A scoring combination as reported by the combination detector.
///
/// Opaque to the engine beyond `value`; `cards` is carried for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    pub name: String,
    /// Point value in kan.
    pub value: i32,
    pub cards: Vec<Card>,
}

impl Combination {
    pub fn new(name: impl Into<String>, value: i32, cards: Vec<Card>) -> Self {
        Self {
            name: name.into(),
            value,
            cards,
        }
    }
}

/// Total kan value of a combination list.
pub fn combination_total(combos: &[Combination]) -> i32 {
    combos.iter().map(|c| c.value).sum()
}

/// How a round terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationReason {
    /// A player banked their combinations and ended the round.
    LockedIn,
    /// A risk declarer converted their risk into a half-value payout.
    Retreated,
    /// The round ran out of playable cards.
    Exhausted,
}

/// Stakes multiplier derived from the dealt field's exact bright cards.
///
/// Rain Man or Phoenix on the field makes a grand field (4x); otherwise any of
/// Crane, Curtain or Moon makes a large field (2x); otherwise 1x. This must
/// inspect card identities, not categories: Geese or Swallow on the field
/// trigger nothing.
pub fn field_multiplier(field: &[Card]) -> u8 {
    if field.iter().any(|c| GRAND_BRIGHTS.contains(&c.id())) {
        4
    } else if field.iter().any(|c| LARGE_BRIGHTS.contains(&c.id())) {
        2
    } else {
        1
    }
}
