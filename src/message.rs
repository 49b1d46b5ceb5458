/*
 * Copyright Stalwart Labs Ltd.
 *
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 */

use std::{borrow::Cow, fmt::Display};

use mail_builder::headers::address;

/// An e-mail address with an optional display name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Address<'x> {
    pub email: Cow<'x, str>,
    pub name: Option<Cow<'x, str>>,
}

/// A finalized outgoing message, ready to hand off to a delivery library.
#[derive(Debug, Default)]
pub struct Message<'x> {
    pub mail_from: Address<'x>,
    pub rcpt_to: Vec<Address<'x>>,
    pub body: Cow<'x, [u8]>,
}

impl<'x> Address<'x> {
    pub fn new(email: impl Into<Cow<'x, str>>) -> Self {
        Address {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(name: impl Into<Cow<'x, str>>, email: impl Into<Cow<'x, str>>) -> Self {
        Address {
            email: email.into(),
            name: Some(name.into()),
        }
    }

    /// Basic syntactic validity check: exactly one `@`, a non-empty local
    /// part and domain, and no whitespace or control characters.
    pub fn is_valid(&self) -> bool {
        match self.email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !self
                        .email
                        .chars()
                        .any(|ch| ch.is_whitespace() || ch.is_ascii_control())
            }
            None => false,
        }
    }

    pub(crate) fn to_header(&self) -> address::Address<'x> {
        address::Address::new_address(self.name.clone(), self.email.clone())
    }
}

impl<'x> From<&'x str> for Address<'x> {
    fn from(email: &'x str) -> Self {
        Address::new(email)
    }
}

impl<'x> From<String> for Address<'x> {
    fn from(email: String) -> Self {
        Address::new(email)
    }
}

impl<'x> From<(&'x str, &'x str)> for Address<'x> {
    fn from((name, email): (&'x str, &'x str)) -> Self {
        Address::with_name(name, email)
    }
}

impl<'x> From<(String, String)> for Address<'x> {
    fn from((name, email): (String, String)) -> Self {
        Address::with_name(name, email)
    }
}

impl<'x> Display for Address<'x> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => f.write_str(&self.email),
        }
    }
}
