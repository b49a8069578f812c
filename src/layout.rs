/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Sequence layouts of the supported message types, expressed as data.
//!
//! Each [`MtLayout`] lists its sequences in message order. A sequence is
//! located either by its `15X` marker ([`Boundary::Field15`]) or, for
//! subsequences without a marker, by a start/end/tail name pattern
//! ([`Boundary::Delimited`]) applied inside every occurrence of its parent.
//! [`crate::mt::MtView`] interprets these tables; adding a message type is a
//! matter of adding a table here.

/// How a sequence is sliced out of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Opened by `15<letter>`, runs until the next `15` field.
    Field15(&'static str),
    /// See [`crate::sequence::sub_blocks_delimited_with_optional_tail`].
    Delimited {
        start: &'static [&'static str],
        end: &'static [&'static str],
        tail: &'static [&'static str],
    },
}

/// One sequence of a message layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLayout {
    /// Short name, e.g. `"A"` or `"I1"`.
    pub name: &'static str,
    pub title: &'static str,
    /// Enclosing sequence for subsequences.
    pub parent: Option<&'static str>,
    pub boundary: Boundary,
    /// Must occur at least once (inside each parent occurrence).
    pub mandatory: bool,
    /// May occur more than once.
    pub repetitive: bool,
    /// Field of the parent sequence that states the number of occurrences.
    pub counter: Option<&'static str>,
    /// Fields required in every occurrence; wildcard patterns allowed.
    pub mandatory_fields: &'static [&'static str],
}

/// Layout of one message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MtLayout {
    pub message_type: &'static str,
    pub title: &'static str,
    pub sequences: &'static [SequenceLayout],
}

impl MtLayout {
    /// Sequence layout by name.
    pub fn sequence(&self, name: &str) -> Option<&'static SequenceLayout> {
        let sequences: &'static [SequenceLayout] = self.sequences;
        sequences.iter().find(|s| s.name == name)
    }

    /// Top-level sequences, in message order.
    pub fn top_level(&self) -> impl Iterator<Item = &'static SequenceLayout> {
        let sequences: &'static [SequenceLayout] = self.sequences;
        sequences.iter().filter(|s| s.parent.is_none())
    }

    /// Direct subsequences of `parent`.
    pub fn children<'a>(&self, parent: &'a str) -> impl Iterator<Item = &'static SequenceLayout> + 'a {
        let sequences: &'static [SequenceLayout] = self.sequences;
        sequences.iter().filter(move |s| s.parent == Some(parent))
    }

    /// Position of a top-level `15X` letter in layout order.
    pub fn field15_rank(&self, letter: &str) -> Option<usize> {
        self.top_level()
            .position(|s| matches!(s.boundary, Boundary::Field15(l) if l == letter))
    }
}

/// Layout of the given message type (`"320"`), if supported.
pub fn lookup(message_type: &str) -> Option<&'static MtLayout> {
    registry()
        .iter()
        .copied()
        .find(|l| l.message_type == message_type)
}

/// All supported layouts.
pub fn registry() -> &'static [&'static MtLayout] {
    &REGISTRY
}

static REGISTRY: [&MtLayout; 3] = [&MT320, &MT360, &MT361];

const fn seq(
    name: &'static str,
    title: &'static str,
    letter: &'static str,
    mandatory: bool,
    mandatory_fields: &'static [&'static str],
) -> SequenceLayout {
    SequenceLayout {
        name,
        title,
        parent: None,
        boundary: Boundary::Field15(letter),
        mandatory,
        repetitive: false,
        counter: None,
        mandatory_fields,
    }
}

const SETTLEMENT_FIELDS: &[&str] = &["57a"];

// ---------------------------------------------------------------------------
// MT320
// ---------------------------------------------------------------------------

/// MT320 Fixed Loan/Deposit Confirmation.
pub static MT320: MtLayout = MtLayout {
    message_type: "320",
    title: "Fixed Loan/Deposit Confirmation",
    sequences: &[
        seq("A", "General Information", "A", true, &["20", "22A", "22B", "22C", "82a", "87a"]),
        seq(
            "B",
            "Transaction Details",
            "B",
            true,
            &["17R", "30T", "30V", "30P", "32B", "34E", "37G", "14D"],
        ),
        seq("C", "Settlement Instructions for Amounts Payable by Party A", "C", true, SETTLEMENT_FIELDS),
        seq("D", "Settlement Instructions for Amounts Payable by Party B", "D", true, SETTLEMENT_FIELDS),
        seq("E", "Settlement Instructions for Interests Payable by Party A", "E", false, SETTLEMENT_FIELDS),
        seq("F", "Settlement Instructions for Interests Payable by Party B", "F", false, SETTLEMENT_FIELDS),
        seq("G", "Tax Information", "G", false, &["37L", "33B"]),
        seq("H", "Additional Information", "H", false, &[]),
        seq("I", "Additional Amounts", "I", false, &["18A"]),
        SequenceLayout {
            name: "I1",
            title: "Additional Amount",
            parent: Some("I"),
            boundary: Boundary::Delimited {
                start: &["30F"],
                end: &["32H"],
                tail: &[],
            },
            mandatory: true,
            repetitive: true,
            counter: Some("18A"),
            mandatory_fields: &["30F", "32H"],
        },
    ],
};

// ---------------------------------------------------------------------------
// MT360
// ---------------------------------------------------------------------------

/// Payment dates, each optionally followed by its amount.
const PAYMENT_SCHEDULE: Boundary = Boundary::Delimited {
    start: &["30F"],
    end: &["30F"],
    tail: &["32M"],
};

/// MT360 Single Currency Interest Rate Derivative Confirmation.
pub static MT360: MtLayout = MtLayout {
    message_type: "360",
    title: "Single Currency Interest Rate Derivative Confirmation",
    sequences: &[
        seq("A", "General Information", "A", true, &["20", "22A", "22C", "23A", "82a", "87a"]),
        seq("B", "Transaction Details", "B", true, &["30T", "30V", "30P", "32B"]),
        seq("C", "Fixed Interest Payable by Party B", "C", false, &["37U", "14D"]),
        SequenceLayout {
            name: "C1",
            title: "Payment Schedule",
            parent: Some("C"),
            boundary: PAYMENT_SCHEDULE,
            mandatory: false,
            repetitive: true,
            counter: Some("18A"),
            mandatory_fields: &["30F"],
        },
        seq("D", "Floating Interest Payable by Party B", "D", false, &["14F", "14D"]),
        seq("E", "Fixed Interest Payable by Party A", "E", false, &["37U", "14D"]),
        SequenceLayout {
            name: "E1",
            title: "Payment Schedule",
            parent: Some("E"),
            boundary: PAYMENT_SCHEDULE,
            mandatory: false,
            repetitive: true,
            counter: Some("18A"),
            mandatory_fields: &["30F"],
        },
        seq("F", "Floating Interest Payable by Party A", "F", false, &["14F", "14D"]),
        seq("G", "Settlement Instructions for Payments Received by Party A", "G", true, SETTLEMENT_FIELDS),
        seq("H", "Settlement Instructions for Payments Received by Party B", "H", true, SETTLEMENT_FIELDS),
        seq("I", "Additional Information", "I", false, &[]),
    ],
};

// ---------------------------------------------------------------------------
// MT361
// ---------------------------------------------------------------------------

/// MT361 Cross Currency Interest Rate Swap Confirmation.
pub static MT361: MtLayout = MtLayout {
    message_type: "361",
    title: "Cross Currency Interest Rate Swap Confirmation",
    sequences: &[
        seq("A", "General Information", "A", true, &["20", "22A", "22C", "23A", "82a", "87a"]),
        seq("B", "Transaction Details", "B", true, &["30T", "30V", "30P"]),
        seq("C", "Fixed Interest Payable by Party B", "C", false, &["32B", "37U", "14D"]),
        seq("D", "Floating Interest Payable by Party B", "D", false, &["32B", "14F", "14D"]),
        seq("E", "Fixed Interest Payable by Party A", "E", false, &["32B", "37U", "14D"]),
        seq("F", "Floating Interest Payable by Party A", "F", false, &["32B", "14F", "14D"]),
        seq("G", "Principal Exchanges", "G", false, &[]),
        SequenceLayout {
            name: "G1",
            title: "Principal Exchange Details",
            parent: Some("G"),
            boundary: Boundary::Delimited {
                start: &["22X"],
                end: &["32M"],
                tail: &["57a"],
            },
            mandatory: true,
            repetitive: true,
            counter: None,
            mandatory_fields: &["22X", "30F", "32M"],
        },
        seq("H", "Settlement Instructions for Payments Received by Party A", "H", true, SETTLEMENT_FIELDS),
        seq("I", "Settlement Instructions for Payments Received by Party B", "I", true, SETTLEMENT_FIELDS),
        seq("J", "Additional Information", "J", false, &[]),
    ],
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
