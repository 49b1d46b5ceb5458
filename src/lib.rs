/*
 * Copyright Stalwart Labs Ltd. See the COPYING
 * file at the top-level directory of this distribution.
 *
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 */

//! # mail-draft
//!
//! [![crates.io](https://img.shields.io/crates/v/mail-draft)](https://crates.io/crates/mail-draft)
//! [![docs.rs](https://img.shields.io/docsrs/mail-draft)](https://docs.rs/mail-draft)
//! [![crates.io](https://img.shields.io/crates/l/mail-draft)](http://www.apache.org/licenses/LICENSE-2.0)
//!
//! _mail-draft_ is a Rust library to compose outgoing e-mail messages. It includes
//! the following features:
//!
//! - Mutable **draft** holding the envelope fields of a message: sender, To, Cc,
//!   Bcc and Reply-To recipients, custom headers, subject, bodies and sent date.
//! - **Validation** of e-mail addresses and headers at the moment they are added,
//!   plus required-field checks when the draft is built.
//! - One-shot **build** step producing an immutable [`Message`] conforming to the
//!   Internet Message Format standard (_RFC 5322_), rendered by the
//!   [`mail-builder`](https://crates.io/crates/mail-builder) crate.
//! - Transport [`Session`] configuration derived from the configured host name,
//!   ready to hand to a delivery library.
//!
//! ## Usage Example
//!
//! Compose a message and obtain its transport session:
//!
//! ```rust
//!     // Compose a draft
//!     let mut email = Email::new();
//!     email
//!         .set_from(("John Doe", "john@example.com"))?
//!         .add_to("jane@example.com")?
//!         .set_subject("Hi!")
//!         .set_text_body("Hello, world!");
//!     email.set_host_name("mail.example.com");
//!
//!     // Obtain the transport configuration for a delivery library
//!     let session = email.mail_session()?;
//!
//!     // Validate the draft and render the outgoing message. A draft
//!     // builds exactly once; a second call returns an error.
//!     let message = email.build()?;
//! ```
//!
//! Delivery, authentication and retries are out of scope and belong to the
//! delivery library consuming the built message, for example
//! [`mail-send`](https://crates.io/crates/mail-send).
//!

pub mod email;
pub mod message;
pub mod session;

use std::fmt::Display;

pub use email::Email;
pub use mail_builder;
pub use message::{Address, Message};
pub use session::Session;

#[derive(Debug)]
pub enum Error {
    /// I/O error while rendering the MIME message.
    Io(std::io::Error),

    /// Syntactically invalid e-mail address.
    InvalidAddress(String),

    /// Empty custom header name.
    EmptyHeaderName,

    /// Empty custom header value.
    EmptyHeaderValue,

    /// Missing message sender.
    MissingFrom,

    /// Missing message recipients.
    MissingRecipients,

    /// The draft was already built.
    AlreadyBuilt,

    /// No host name configured for the mail session.
    MissingHostname,
}

/// Error category, mirroring the phase that produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    State,
    Config,
    Io,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::InvalidAddress(_)
            | Error::EmptyHeaderName
            | Error::EmptyHeaderValue
            | Error::MissingFrom
            | Error::MissingRecipients => ErrorKind::Validation,
            Error::AlreadyBuilt => ErrorKind::State,
            Error::MissingHostname => ErrorKind::Config,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::InvalidAddress(address) => write!(f, "Invalid e-mail address: {}", address),
            Error::EmptyHeaderName => write!(f, "Header name can not be empty"),
            Error::EmptyHeaderValue => write!(f, "Header value can not be empty"),
            Error::MissingFrom => write!(f, "From address required"),
            Error::MissingRecipients => write!(f, "At least one receiver address required"),
            Error::AlreadyBuilt => write!(f, "The message is already built"),
            Error::MissingHostname => write!(f, "Cannot find valid hostname for mail session"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
