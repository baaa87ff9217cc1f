//! The table: every card and every pile, with an owner index.
//!
//! `Table` tracks where cards are located and moves them between piles.
//! Piles hold ordered card ids; each card holds a weak `PileId` back to the
//! pile that owns it. Both sides are only ever updated together here, so the
//! owner index never disagrees with pile membership.
//!
//! ## Invariants
//!
//! - Exactly 52 cards exist, one per (value, suit) pair
//! - A card is in at most one pile; `card.pile` names it
//! - A card with `pile == None` is detached (in flight between piles)
//!
//! ## Usage
//!
//! ```
//! use klondike_engine::cards::Deck;
//! use klondike_engine::piles::{PileId, Table};
//!
//! let table = Table::dealt(&Deck::ordered());
//!
//! assert_eq!(table.pile(PileId::tableau(6)).len(), 7);
//! assert_eq!(table.pile(PileId::STOCK).len(), 24);
//! assert_eq!(table.placed_cards(), 52);
//! ```

use crate::cards::{Card, CardId, Deck, Face, DECK_SIZE};

use super::pile::{Pile, PileId, Section, PILE_COUNT, TABLEAU_COUNT};
use super::snapshot::TableSnapshot;

/// Card counts the win and winnable checks are computed from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
    /// Face-down cards on tableau piles.
    pub tableau_face_down: usize,
    /// Cards on tableau piles.
    pub tableau: usize,
    /// Cards on foundation piles.
    pub foundation: usize,
    /// Cards in the stock.
    pub stock: usize,
    /// Cards in the talon.
    pub talon: usize,
}

impl Census {
    /// Tableau plus foundation cards. Talon cards are not part of this count.
    #[must_use]
    pub fn combined(&self) -> usize {
        self.tableau + self.foundation
    }
}

/// All cards and piles of one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    cards: Vec<Card>,
    piles: Vec<Pile>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// A table with every pile empty and every card detached, face-down.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cards: CardId::all().map(Card::new).collect(),
            piles: PileId::all().map(Pile::new).collect(),
        }
    }

    /// A table dealt from `deck` in the classic cascade.
    #[must_use]
    pub fn dealt(deck: &Deck) -> Self {
        let mut table = Self::new();
        table.deal(deck);
        table
    }

    /// Deal `deck` onto this table, discarding whatever was on it.
    ///
    /// Row by row, column `c` receives `c + 1` cards; only the last card of
    /// each column lands face-up. The remaining 24 cards go face-down to the
    /// stock, the last one dealt on top.
    pub fn deal(&mut self, deck: &Deck) {
        self.clear();

        let mut next = deck.cards().iter().copied();
        for row in 0..TABLEAU_COUNT {
            for col in row..TABLEAU_COUNT {
                if let Some(card) = next.next() {
                    let face = if row == col { Face::Up } else { Face::Down };
                    self.place(card, PileId::tableau(col), face);
                }
            }
        }
        for card in next {
            self.place(card, PileId::STOCK, Face::Down);
        }
    }

    /// Build a table from an explicit arrangement.
    ///
    /// Each entry lists a pile's cards bottom to top with their facing. Cards
    /// not mentioned anywhere go face-down to the stock in id order.
    ///
    /// Panics if a card is listed twice.
    #[must_use]
    pub fn arranged(piles: &[(PileId, &[(CardId, Face)])]) -> Self {
        let mut table = Self::new();
        for (pile, cards) in piles {
            for &(card, face) in cards.iter() {
                if table.cards[card.index()].pile.is_some() {
                    panic!("Card {} listed twice in arrangement", card);
                }
                table.place(card, *pile, face);
            }
        }
        for card in CardId::all() {
            if table.cards[card.index()].pile.is_none() {
                table.place(card, PileId::STOCK, Face::Down);
            }
        }
        table
    }

    fn clear(&mut self) {
        for pile in &mut self.piles {
            pile.clear();
        }
        for card in &mut self.cards {
            card.pile = None;
            card.face = Face::Down;
        }
    }

    fn place(&mut self, card: CardId, pile: PileId, face: Face) {
        let entry = &mut self.cards[card.index()];
        entry.face = face;
        entry.pile = Some(pile);
        self.piles[pile.index()].push(card);
    }

    // === Lookup ===

    #[must_use]
    pub fn card(&self, id: CardId) -> &Card {
        &self.cards[id.index()]
    }

    #[must_use]
    pub fn pile(&self, id: PileId) -> &Pile {
        &self.piles[id.index()]
    }

    pub fn pile_mut(&mut self, id: PileId) -> &mut Pile {
        &mut self.piles[id.index()]
    }

    /// All piles in enumeration order.
    #[must_use]
    pub fn piles(&self) -> &[Pile] {
        &self.piles
    }

    /// All cards in id order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The pile a card is on, `None` while it is in flight.
    #[must_use]
    pub fn pile_of(&self, card: CardId) -> Option<PileId> {
        self.cards[card.index()].pile
    }

    /// Top card of a pile.
    #[must_use]
    pub fn top(&self, pile: PileId) -> Option<&Card> {
        self.pile(pile).top().map(|id| self.card(id))
    }

    /// Number of cards currently on some pile.
    #[must_use]
    pub fn placed_cards(&self) -> usize {
        self.piles.iter().map(Pile::len).sum()
    }

    /// Whether `card` is the top of a tableau pile.
    #[must_use]
    pub fn is_stackable(&self, card: CardId) -> bool {
        self.pile_of(card)
            .is_some_and(|pile| self.pile(pile).is_stackable(card))
    }

    // === Mutation ===

    /// Toggle a card's facing.
    pub fn flip(&mut self, card: CardId) {
        self.cards[card.index()].flip();
    }

    /// Set a card's facing.
    pub fn set_face(&mut self, card: CardId, face: Face) {
        self.cards[card.index()].face = face;
    }

    /// Detach the top `count` cards of `pile`, preserving their order.
    ///
    /// Detached cards belong to no pile until `attach` is called.
    pub fn detach_top(&mut self, pile: PileId, count: usize) -> Vec<CardId> {
        let cards = self.piles[pile.index()].split_top(count);
        for &card in &cards {
            self.cards[card.index()].pile = None;
        }
        cards
    }

    /// Attach detached cards on top of `pile`, in the given order.
    pub fn attach(&mut self, pile: PileId, cards: &[CardId]) {
        for &card in cards {
            debug_assert!(self.cards[card.index()].pile.is_none(), "attaching a placed card");
            self.cards[card.index()].pile = Some(pile);
            self.piles[pile.index()].push(card);
        }
    }

    /// Move the top card of `from` onto `to`, setting its facing.
    fn shift_top(&mut self, from: PileId, to: PileId, face: Face) -> Option<CardId> {
        let card = self.piles[from.index()].pop()?;
        self.place(card, to, face);
        Some(card)
    }

    /// Recycle the talon into the stock, then draw one card back.
    ///
    /// Talon cards are taken top to bottom and flipped face-down onto the
    /// stock, which reverses them so the first card ever drawn is again the
    /// next to draw. That card is then drawn straight back onto the talon.
    ///
    /// Returns every card that changed pile, in the order they moved.
    pub fn replenish(&mut self) -> Vec<CardId> {
        let mut moved = Vec::with_capacity(self.pile(PileId::TALON).len() + 1);
        while let Some(card) = self.shift_top(PileId::TALON, PileId::STOCK, Face::Down) {
            moved.push(card);
        }
        if let Some(card) = self.shift_top(PileId::STOCK, PileId::TALON, Face::Up) {
            moved.push(card);
        }
        moved
    }

    /// Exact inverse of `replenish`: stock cards, top to bottom, go face-up
    /// onto the talon.
    pub fn deplenish(&mut self) -> Vec<CardId> {
        let mut moved = Vec::with_capacity(self.pile(PileId::STOCK).len());
        while let Some(card) = self.shift_top(PileId::STOCK, PileId::TALON, Face::Up) {
            moved.push(card);
        }
        moved
    }

    // === Queries for win detection ===

    /// Card counts per section.
    #[must_use]
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for pile in &self.piles {
            match pile.section() {
                Section::Tableau => {
                    census.tableau += pile.len();
                    census.tableau_face_down += pile
                        .cards()
                        .iter()
                        .filter(|&&c| !self.card(c).is_face_up())
                        .count();
                }
                Section::Foundation => census.foundation += pile.len(),
                Section::Stock => census.stock += pile.len(),
                Section::Talon => census.talon += pile.len(),
            }
        }
        census
    }

    /// Cards on the four foundations.
    #[must_use]
    pub fn foundation_total(&self) -> usize {
        PileId::foundations().map(|p| self.pile(p).len()).sum()
    }

    /// All 52 cards are on the foundations.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.foundation_total() == DECK_SIZE
    }

    // === Snapshots ===

    /// Capture pile membership, order and facing.
    #[must_use]
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot::capture(self)
    }

    /// Replace this table's contents with a snapshot.
    ///
    /// Cards the snapshot does not place are left detached.
    pub fn restore(&mut self, snapshot: &TableSnapshot) {
        self.clear();
        for (index, pile) in snapshot.piles.iter().enumerate().take(PILE_COUNT) {
            for &(card, face) in pile {
                self.place(card, PileId(index as u8), face);
            }
        }
    }
}
