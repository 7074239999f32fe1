use std::char;
use std::fmt;

pub const TILE_COUNT: usize = 144;
pub const GROUP_SIZE: usize = 4;

pub type TileId = usize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Suit {
    Characters,
    Bamboo,
    Dots,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Wind {
    East,
    South,
    West,
    North,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Dragon {
    Red,
    Green,
    White,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Flower {
    Plum,
    Orchid,
    Bamboo,
    Chrysanthemum,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

const SUITS: [Suit; 3] = [Suit::Characters, Suit::Bamboo, Suit::Dots];
const WINDS: [Wind; 4] = [Wind::East, Wind::South, Wind::West, Wind::North];
const DRAGONS: [Dragon; 3] = [Dragon::Red, Dragon::Green, Dragon::White];
const FLOWERS: [Flower; 4] = [Flower::Plum, Flower::Orchid, Flower::Bamboo, Flower::Chrysanthemum];
const SEASONS: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    Suited(Suit, u8),
    Wind(Wind),
    Dragon(Dragon),
    Flower(Flower),
    Season(Season),
}

// Flowers and seasons each fold into a single group
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum MatchGroup {
    Suited(Suit, u8),
    Wind(Wind),
    Dragon(Dragon),
    Flowers,
    Seasons,
}

impl Face {
    pub fn group(self) -> MatchGroup {
        match self {
            Face::Suited(suit, rank) => MatchGroup::Suited(suit, rank),
            Face::Wind(wind) => MatchGroup::Wind(wind),
            Face::Dragon(dragon) => MatchGroup::Dragon(dragon),
            Face::Flower(_) => MatchGroup::Flowers,
            Face::Season(_) => MatchGroup::Seasons,
        }
    }

    // Mahjong Tiles block, U+1F000..U+1F029
    fn glyph(self) -> char {
        let offset = match self {
            Face::Wind(wind) => wind as u32,
            Face::Dragon(dragon) => 0x04 + dragon as u32,
            Face::Suited(suit, rank) => 0x07 + 9 * suit as u32 + rank as u32 - 1,
            Face::Flower(flower) => 0x22 + flower as u32,
            Face::Season(season) => 0x26 + season as u32,
        };
        char::from_u32(0x1F000 + offset).unwrap_or('?')
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Tile {
    pub id: TileId,
    pub face: Face,
}

impl Tile {
    pub fn group(&self) -> MatchGroup {
        self.face.group()
    }
}

pub fn catalog() -> Vec<Tile> {
    let suited = SUITS.iter()
        .flat_map(|&suit| (1..=9).map(move |rank| Face::Suited(suit, rank)));
    let honors = WINDS.iter().map(|&w| Face::Wind(w))
        .chain(DRAGONS.iter().map(|&d| Face::Dragon(d)));
    let quadrupled = suited.chain(honors)
        .flat_map(|face| std::iter::repeat(face).take(GROUP_SIZE));
    let bonus = FLOWERS.iter().map(|&f| Face::Flower(f))
        .chain(SEASONS.iter().map(|&s| Face::Season(s)));

    quadrupled.chain(bonus)
        .enumerate()
        .map(|(id, face)| Tile { id, face })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn catalog_has_36_groups_of_four() {
        let tiles = catalog();
        assert_eq!(tiles.len(), TILE_COUNT);

        let mut groups: HashMap<MatchGroup, usize> = HashMap::new();
        for tile in &tiles {
            *groups.entry(tile.group()).or_default() += 1;
        }
        assert_eq!(groups.len(), 36);
        assert!(groups.values().all(|&n| n == GROUP_SIZE));
    }

    #[test]
    fn ids_are_unique_and_dense() {
        let tiles = catalog();
        for (i, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.id, i);
        }
    }

    #[test]
    fn bonus_tiles_fold_into_one_group_each() {
        assert_eq!(Face::Flower(Flower::Plum).group(), Face::Flower(Flower::Orchid).group());
        assert_eq!(Face::Season(Season::Spring).group(), Face::Season(Season::Winter).group());
        assert_ne!(Face::Flower(Flower::Bamboo).group(), Face::Suited(Suit::Bamboo, 1).group());
    }

    #[test]
    fn glyphs() {
        assert_eq!(Face::Wind(Wind::East).to_string(), "🀀");
        assert_eq!(Face::Dragon(Dragon::Red).to_string(), "🀄");
        assert_eq!(Face::Suited(Suit::Characters, 1).to_string(), "🀇");
        assert_eq!(Face::Suited(Suit::Bamboo, 1).to_string(), "🀐");
        assert_eq!(Face::Suited(Suit::Dots, 9).to_string(), "🀡");
        assert_eq!(Face::Season(Season::Winter).to_string(), "🀩");
    }
}
