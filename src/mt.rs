/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Typed, layout-driven views over MT message bodies.
//!
//! [`MtView`] pairs a message body with its [`MtLayout`] and answers field
//! and sequence lookups by name. [`Mt320`], [`Mt360`] and [`Mt361`] are thin
//! wrappers that only accept their own message type.
//!
//! ## Example
//!
//! ```rust
//! use alice_swift::{mt::Mt320, parser};
//!
//! let fin = "{2:I320BANKDEFFXXXXN}{4:\r\n:15A:\r\n:20:REF1\r\n:15B:\r\n:30T:20260105\r\n-}";
//! let msg = parser::parse(fin).unwrap();
//! let mt = Mt320::new(&msg).unwrap();
//! assert_eq!(mt.sequence("A").unwrap().field("20"), Some("REF1"));
//! assert_eq!(mt.sequence("B").unwrap().field("30T"), Some("20260105"));
//! ```

use std::ops::Deref;

use crate::block::TagList;
use crate::layout::{self, Boundary, MtLayout, SequenceLayout};
use crate::message::SwiftMessage;
use crate::sequence::{field15_sequences, sub_blocks_delimited_with_optional_tail};

/// One occurrence of a sequence, with its tags copied out of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub layout: &'static SequenceLayout,
    tags: TagList,
}

impl Sequence {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.layout.name
    }

    #[inline]
    pub fn title(&self) -> &'static str {
        self.layout.title
    }

    #[inline]
    pub fn tags(&self) -> &TagList {
        &self.tags
    }

    /// First value of `name` inside this occurrence (subsequences included).
    pub fn field(&self, name: &str) -> Option<&str> {
        self.tags.get(name)
    }

    /// All values of `name` inside this occurrence.
    pub fn fields(&self, name: &str) -> Vec<&str> {
        self.tags.get_all(name)
    }
}

/// A message body interpreted through its layout.
#[derive(Debug, Clone, Copy)]
pub struct MtView<'a> {
    layout: &'static MtLayout,
    body: &'a TagList,
}

impl<'a> MtView<'a> {
    /// View of `msg` using the layout registered for its message type.
    ///
    /// Returns `None` when block 2 or block 4 is missing or the type has no
    /// layout.
    pub fn new(msg: &'a SwiftMessage) -> Option<Self> {
        let layout = layout::lookup(msg.message_type()?)?;
        Some(Self::with_layout(layout, msg.body()?))
    }

    /// View of an arbitrary body with an explicit layout.
    pub fn with_layout(layout: &'static MtLayout, body: &'a TagList) -> Self {
        Self { layout, body }
    }

    #[inline]
    pub fn layout(&self) -> &'static MtLayout {
        self.layout
    }

    #[inline]
    pub fn message_type(&self) -> &'static str {
        self.layout.message_type
    }

    #[inline]
    pub fn body(&self) -> &'a TagList {
        self.body
    }

    /// First value of a field anywhere in the body.
    pub fn field(&self, name: &str) -> Option<&'a str> {
        self.body.get(name)
    }

    /// Every value of a field anywhere in the body.
    pub fn fields(&self, name: &str) -> Vec<&'a str> {
        self.body.get_all(name)
    }

    /// First occurrence of the named sequence.
    pub fn sequence(&self, name: &str) -> Option<Sequence> {
        self.sequences(name).into_iter().next()
    }

    /// Every occurrence of the named sequence, in message order.
    ///
    /// Subsequences are searched inside each occurrence of their parent.
    /// Unknown names yield an empty list.
    pub fn sequences(&self, name: &str) -> Vec<Sequence> {
        let Some(seq) = self.layout.sequence(name) else {
            return Vec::new();
        };
        match seq.parent {
            None => slice(seq, self.body),
            Some(parent) => self
                .sequences(parent)
                .iter()
                .flat_map(|p| slice(seq, &p.tags))
                .collect(),
        }
    }

    /// Occurrences of the subsequence `name` inside one parent occurrence.
    pub fn sequences_within(&self, name: &str, parent: &Sequence) -> Vec<Sequence> {
        match self.layout.sequence(name) {
            Some(seq) if seq.parent == Some(parent.name()) => slice(seq, &parent.tags),
            _ => Vec::new(),
        }
    }

    /// Every sequence occurrence present in the body, grouped by layout
    /// order.
    pub fn present_sequences(&self) -> Vec<Sequence> {
        self.layout
            .sequences
            .iter()
            .flat_map(|s| self.sequences(s.name))
            .collect()
    }
}

fn slice(seq: &'static SequenceLayout, tags: &TagList) -> Vec<Sequence> {
    let blocks = match seq.boundary {
        Boundary::Field15(letter) => field15_sequences(tags, letter),
        Boundary::Delimited { start, end, tail } => {
            sub_blocks_delimited_with_optional_tail(tags, start, end, tail)
        }
    };
    blocks
        .into_iter()
        .map(|tags| Sequence { layout: seq, tags })
        .collect()
}

macro_rules! mt_view_type {
    ($(#[$doc:meta])* $name:ident, $mt:literal, $layout:path) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a>(MtView<'a>);

        impl<'a> $name<'a> {
            pub const MESSAGE_TYPE: &'static str = $mt;

            /// `None` unless `msg` is of this message type and has a body.
            pub fn new(msg: &'a SwiftMessage) -> Option<Self> {
                if msg.message_type()? != Self::MESSAGE_TYPE {
                    return None;
                }
                Some(Self(MtView::with_layout(&$layout, msg.body()?)))
            }
        }

        impl<'a> Deref for $name<'a> {
            type Target = MtView<'a>;

            fn deref(&self) -> &MtView<'a> {
                &self.0
            }
        }
    };
}

mt_view_type!(
    /// MT320 Fixed Loan/Deposit Confirmation.
    Mt320, "320", layout::MT320
);
mt_view_type!(
    /// MT360 Single Currency Interest Rate Derivative Confirmation.
    Mt360, "360", layout::MT360
);
mt_view_type!(
    /// MT361 Cross Currency Interest Rate Swap Confirmation.
    Mt361, "361", layout::MT361
);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MessageBuilder;

    fn mt320() -> SwiftMessage {
        MessageBuilder::new("BANKBEBB", "BANKDEFF", "320")
            .sequence("A")
            .field("20", "REF")
            .field("22A", "NEWT")
            .sequence("B")
            .field("30T", "20260105")
            .field("32B", "EUR1000000,")
            .sequence("C")
            .field("57A", "BANKBEBB")
            .sequence("D")
            .field("57D", "NAME\nCITY")
            .sequence("I")
            .field("18A", "2")
            .field("30F", "20260201")
            .field("32H", "EUR100,")
            .field("30F", "20260301")
            .field("32H", "EUR110,")
            .build()
    }

    #[test]
    fn test_top_level_sequences() {
        let msg = mt320();
        let mt = Mt320::new(&msg).unwrap();
        let a = mt.sequence("A").unwrap();
        assert_eq!(a.name(), "A");
        assert_eq!(a.title(), "General Information");
        assert_eq!(a.field("22A"), Some("NEWT"));
        assert_eq!(a.field("30T"), None);
        assert_eq!(mt.sequence("B").unwrap().field("32B"), Some("EUR1000000,"));
        assert_eq!(mt.sequence("D").unwrap().field("57a"), Some("NAME\r\nCITY"));
        assert!(mt.sequence("E").is_none());
    }

    #[test]
    fn test_subsequences_resolved_inside_parent() {
        let msg = mt320();
        let mt = Mt320::new(&msg).unwrap();
        let amounts = mt.sequences("I1");
        assert_eq!(amounts.len(), 2);
        assert_eq!(amounts[1].field("30F"), Some("20260301"));
        assert_eq!(amounts[1].field("32H"), Some("EUR110,"));

        let i = mt.sequence("I").unwrap();
        assert_eq!(mt.sequences_within("I1", &i).len(), 2);
        assert!(mt.sequences_within("I1", &mt.sequence("A").unwrap()).is_empty());
    }

    #[test]
    fn test_unknown_sequence() {
        let msg = mt320();
        let mt = MtView::new(&msg).unwrap();
        assert!(mt.sequences("Z").is_empty());
        assert_eq!(mt.message_type(), "320");
    }

    #[test]
    fn test_present_sequences_in_layout_order() {
        let msg = mt320();
        let mt = MtView::new(&msg).unwrap();
        let names: Vec<_> = mt.present_sequences().iter().map(Sequence::name).collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "I", "I1", "I1"]);
    }

    #[test]
    fn test_wrapper_rejects_other_types() {
        let msg = mt320();
        assert!(Mt360::new(&msg).is_none());
        assert!(Mt361::new(&msg).is_none());
        assert_eq!(Mt320::MESSAGE_TYPE, "320");
    }

    #[test]
    fn test_view_requires_layout_and_body() {
        let msg = MessageBuilder::new("BANKBEBB", "BANKDEFF", "103").build();
        assert!(MtView::new(&msg).is_none());
        let mut headerless = SwiftMessage::new();
        headerless.body_mut().push("20", "X");
        assert!(MtView::new(&headerless).is_none());
    }

    #[test]
    fn test_mt360_payment_schedule() {
        let msg = MessageBuilder::new("BANKBEBB", "BANKDEFF", "360")
            .sequence("A")
            .field("20", "SWAP1")
            .sequence("C")
            .field("37U", "2,5")
            .field("18A", "3")
            .field("30F", "20260701")
            .field("32M", "EUR1250,")
            .field("30F", "20270101")
            .field("30F", "20270701")
            .field("32M", "EUR1250,")
            .field("14D", "30/360")
            .build();
        let mt = Mt360::new(&msg).unwrap();
        let schedule = mt.sequences("C1");
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].field("32M"), Some("EUR1250,"));
        assert_eq!(schedule[1].field("32M"), None);
        assert!(mt.sequences("E1").is_empty());
    }

    #[test]
    fn test_mt361_principal_exchange() {
        let msg = MessageBuilder::new("BANKBEBB", "BANKDEFF", "361")
            .sequence("G")
            .field("22X", "IEXC")
            .field("30F", "20260105")
            .field("32M", "USD1000000,")
            .field("57A", "BANKUS33")
            .field("22X", "FEXC")
            .field("30F", "20310105")
            .field("32M", "EUR900000,")
            .sequence("H")
            .field("57A", "BANKBEBB")
            .build();
        let mt = Mt361::new(&msg).unwrap();
        let ex = mt.sequences("G1");
        assert_eq!(ex.len(), 2);
        assert_eq!(ex[0].field("57a"), Some("BANKUS33"));
        assert_eq!(ex[1].field("22X"), Some("FEXC"));
        assert_eq!(ex[1].field("57a"), None);
    }
}
