//! Trace line decoding.

use std::fmt;

use crate::types::{page_of, Address, PageNumber};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "R" => Some(Operation::Read),
            "W" => Some(Operation::Write),
            _ => None,
        }
    }

    pub fn is_write(self) -> bool {
        self == Operation::Write
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "R"),
            Operation::Write => write!(f, "W"),
        }
    }
}

/// One decoded trace reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub page_number: PageNumber,
    pub operation: Operation,
}

impl Reference {
    pub fn new(page_number: PageNumber, operation: Operation) -> Self {
        Reference { page_number, operation }
    }

    pub fn from_address(address: Address, operation: Operation) -> Self {
        Reference::new(page_of(address), operation)
    }
}

/// Decodes a `<hex-address> <R|W>` line.
///
/// Returns `None` for anything else: wrong token count, a non-hex address or
/// an unknown operation token. Callers decide whether that is fatal.
pub fn decode(line: &str) -> Option<Reference> {
    let mut tokens = line.split_whitespace();

    let address = tokens.next()?;
    let operation = tokens.next()?;

    if tokens.next().is_some() {
        return None;
    }

    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);

    let address = Address::from_str_radix(digits, 16).ok()?;
    let operation = Operation::from_token(operation)?;

    Some(Reference::from_address(address, operation))
}
