/*
 * Copyright Stalwart Labs Ltd.
 *
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 */

use std::{borrow::Cow, time::Duration};

use chrono::{DateTime, Utc};
use mail_builder::{
    headers::{address, date::Date, text::Text},
    MessageBuilder,
};
use tracing::debug;

use crate::{session::Session, Address, Error, Message};

/// A mutable e-mail draft.
///
/// Envelope fields may be set in any order and any number of times before the
/// draft is built. [`Email::build`] validates the required fields, renders the
/// MIME message and freezes the draft; a second build attempt fails.
#[derive(Debug)]
pub struct Email<'x> {
    from: Option<Address<'x>>,
    to: Vec<Address<'x>>,
    cc: Vec<Address<'x>>,
    bcc: Vec<Address<'x>>,
    reply_to: Vec<Address<'x>>,
    headers: Vec<(Cow<'x, str>, Cow<'x, str>)>,
    subject: Option<Cow<'x, str>>,
    text_body: Option<Cow<'x, str>>,
    html_body: Option<Cow<'x, str>>,
    sent_date: Option<DateTime<Utc>>,
    host_name: Option<Cow<'x, str>>,
    port: u16,
    timeout: Duration,
    message: Option<Message<'x>>,
}

impl Default for Email<'_> {
    fn default() -> Self {
        Email {
            from: None,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            reply_to: Vec::new(),
            headers: Vec::new(),
            subject: None,
            text_body: None,
            html_body: None,
            sent_date: None,
            host_name: None,
            port: 25,
            timeout: Duration::from_secs(60),
            message: None,
        }
    }
}

impl<'x> Email<'x> {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    fn checked(address: Address<'x>) -> crate::Result<Address<'x>> {
        if address.is_valid() {
            Ok(address)
        } else {
            Err(Error::InvalidAddress(address.email.to_string()))
        }
    }

    /// Sets the sender of the message.
    pub fn set_from(&mut self, address: impl Into<Address<'x>>) -> crate::Result<&mut Self> {
        self.from = Some(Self::checked(address.into())?);
        Ok(self)
    }

    /// Appends a To recipient.
    pub fn add_to(&mut self, address: impl Into<Address<'x>>) -> crate::Result<&mut Self> {
        let address = Self::checked(address.into())?;
        self.to.push(address);
        Ok(self)
    }

    /// Appends a Cc recipient.
    pub fn add_cc(&mut self, address: impl Into<Address<'x>>) -> crate::Result<&mut Self> {
        let address = Self::checked(address.into())?;
        self.cc.push(address);
        Ok(self)
    }

    /// Appends a Bcc recipient.
    pub fn add_bcc(&mut self, address: impl Into<Address<'x>>) -> crate::Result<&mut Self> {
        let address = Self::checked(address.into())?;
        self.bcc.push(address);
        Ok(self)
    }

    /// Appends a Reply-To address.
    pub fn add_reply_to(&mut self, address: impl Into<Address<'x>>) -> crate::Result<&mut Self> {
        let address = Self::checked(address.into())?;
        self.reply_to.push(address);
        Ok(self)
    }

    /// Adds a custom header, replacing any existing entry with the same name.
    ///
    /// Header names are matched ASCII case-insensitively; a replaced entry
    /// keeps its original position.
    pub fn add_header(
        &mut self,
        name: impl Into<Cow<'x, str>>,
        value: impl Into<Cow<'x, str>>,
    ) -> crate::Result<&mut Self> {
        let name = name.into();
        let value = value.into();
        if name.trim().is_empty() {
            return Err(Error::EmptyHeaderName);
        }
        if value.trim().is_empty() {
            return Err(Error::EmptyHeaderValue);
        }
        match self
            .headers
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name.as_ref()))
        {
            Some(index) => self.headers[index].1 = value,
            None => self.headers.push((name, value)),
        }
        Ok(self)
    }

    /// Sets the message subject.
    pub fn set_subject(&mut self, subject: impl Into<Cow<'x, str>>) -> &mut Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the plain text body.
    pub fn set_text_body(&mut self, body: impl Into<Cow<'x, str>>) -> &mut Self {
        self.text_body = Some(body.into());
        self
    }

    /// Sets the HTML body.
    pub fn set_html_body(&mut self, body: impl Into<Cow<'x, str>>) -> &mut Self {
        self.html_body = Some(body.into());
        self
    }

    /// Sets the sent date. When unset, the build time is used.
    pub fn set_sent_date(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.sent_date = Some(date);
        self
    }

    /// Sets the host name used to obtain the mail session.
    pub fn set_host_name(&mut self, host_name: impl Into<Cow<'x, str>>) -> &mut Self {
        self.host_name = Some(host_name.into());
        self
    }

    /// Sets the SMTP port of the mail session.
    pub fn set_smtp_port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }

    /// Sets the socket timeout of the mail session.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    pub fn from_address(&self) -> Option<&Address<'x>> {
        self.from.as_ref()
    }

    pub fn to_addresses(&self) -> &[Address<'x>] {
        &self.to
    }

    pub fn cc_addresses(&self) -> &[Address<'x>] {
        &self.cc
    }

    pub fn bcc_addresses(&self) -> &[Address<'x>] {
        &self.bcc
    }

    pub fn reply_to_addresses(&self) -> &[Address<'x>] {
        &self.reply_to
    }

    /// Returns the value of a custom header, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_ref())
    }

    pub fn headers(&self) -> &[(Cow<'x, str>, Cow<'x, str>)] {
        &self.headers
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn sent_date(&self) -> Option<DateTime<Utc>> {
        self.sent_date
    }

    pub fn host_name(&self) -> Option<&str> {
        self.host_name.as_deref()
    }

    pub fn smtp_port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the built message, if the draft was already built.
    pub fn message(&self) -> Option<&Message<'x>> {
        self.message.as_ref()
    }

    /// Obtains the transport session for the configured host name.
    pub fn mail_session(&self) -> crate::Result<Session<'x>> {
        match &self.host_name {
            Some(host) if !host.trim().is_empty() => {
                debug!(host = %host, port = self.port, "creating mail session");
                Ok(Session::new(host.clone(), self.port).timeout(self.timeout))
            }
            _ => Err(Error::MissingHostname),
        }
    }

    /// Validates the draft and renders the outgoing message.
    ///
    /// A draft builds exactly once; later field mutations do not affect the
    /// already built message and a second call fails with
    /// [`Error::AlreadyBuilt`].
    pub fn build(&mut self) -> crate::Result<&Message<'x>> {
        if self.message.is_some() {
            return Err(Error::AlreadyBuilt);
        }
        let mail_from = self.from.clone().ok_or(Error::MissingFrom)?;
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(Error::MissingRecipients);
        }

        let date = self
            .sent_date
            .map_or_else(|| Utc::now().timestamp(), |date| date.timestamp());
        let mut builder = MessageBuilder::new()
            .from(mail_from.to_header())
            .header("Date", Date::new(date));
        if !self.to.is_empty() {
            builder = builder.to(address::Address::new_list(
                self.to.iter().map(Address::to_header).collect(),
            ));
        }
        if !self.cc.is_empty() {
            builder = builder.cc(address::Address::new_list(
                self.cc.iter().map(Address::to_header).collect(),
            ));
        }
        if !self.bcc.is_empty() {
            builder = builder.bcc(address::Address::new_list(
                self.bcc.iter().map(Address::to_header).collect(),
            ));
        }
        if !self.reply_to.is_empty() {
            builder = builder.reply_to(address::Address::new_list(
                self.reply_to.iter().map(Address::to_header).collect(),
            ));
        }
        if let Some(subject) = &self.subject {
            builder = builder.subject(subject.clone());
        }
        for (name, value) in &self.headers {
            builder = builder.header(name.clone(), Text::new(value.clone()));
        }
        if let Some(body) = &self.text_body {
            builder = builder.text_body(body.clone());
        }
        if let Some(body) = &self.html_body {
            builder = builder.html_body(body.clone());
        }

        // Envelope recipients in insertion order, first occurrence wins.
        let mut rcpt_to: Vec<Address<'x>> =
            Vec::with_capacity(self.to.len() + self.cc.len() + self.bcc.len());
        for address in self.to.iter().chain(self.cc.iter()).chain(self.bcc.iter()) {
            if !rcpt_to.iter().any(|rcpt| rcpt.email == address.email) {
                rcpt_to.push(address.clone());
            }
        }

        let body = builder.write_to_vec()?;
        debug!(recipients = rcpt_to.len(), size = body.len(), "message built");

        Ok(self.message.insert(Message {
            mail_from,
            rcpt_to,
            body: body.into(),
        }))
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use crate::{Email, Error, ErrorKind};

    const TEST_EMAILS: [&str; 3] = ["ab@bc.com", "ab@c.org", "hjdfh@fjdfh.com"];
    const TEST_EMAIL: &str = "jiji@hj.com";

    #[test]
    fn add_bcc() {
        let mut email = Email::new();
        for address in TEST_EMAILS {
            email.add_bcc(address).unwrap();
        }
        assert_eq!(3, email.bcc_addresses().len());
    }

    #[test]
    fn add_cc() {
        let mut email = Email::new();
        email.add_cc(TEST_EMAIL).unwrap();
        assert_eq!("jiji@hj.com", email.cc_addresses()[0].email);
    }

    #[test]
    fn add_reply_to() {
        let mut email = Email::new();
        email.add_reply_to(("nahrin", TEST_EMAIL)).unwrap();
        assert_eq!(1, email.reply_to_addresses().len());
        assert_eq!(
            "nahrin <jiji@hj.com>",
            email.reply_to_addresses()[0].to_string()
        );
    }

    #[test]
    fn add_header() {
        let mut email = Email::new();
        email.add_header("X-Priority", "1").unwrap();
        assert_eq!(Some("1"), email.header("X-Priority"));

        // Same name overwrites, case-insensitively
        email.add_header("x-priority", "2").unwrap();
        assert_eq!(Some("2"), email.header("X-Priority"));
        assert_eq!(1, email.headers().len());
    }

    #[test]
    fn add_header_empty_name() {
        let mut email = Email::new();
        let err = email.add_header("", "testheader").unwrap_err();
        assert_eq!("Header name can not be empty", err.to_string());
    }

    #[test]
    fn add_header_empty_value() {
        let mut email = Email::new();
        let err = email.add_header("X-Priority", "").unwrap_err();
        assert_eq!("Header value can not be empty", err.to_string());
    }

    #[test]
    fn set_from() {
        let mut email = Email::new();
        email.set_from(TEST_EMAIL).unwrap();
        assert_eq!("jiji@hj.com", email.from_address().unwrap().to_string());
    }

    #[test]
    fn invalid_addresses() {
        let mut email = Email::new();
        for address in [
            "",
            "plainaddress",
            "@missing-local.org",
            "user@",
            "spaces in@addr.com",
            "two@@ats.com",
        ] {
            let err = email.add_to(address).unwrap_err();
            assert!(
                matches!(err, Error::InvalidAddress(_)),
                "{:?} should be rejected",
                address
            );
        }
        assert!(email.to_addresses().is_empty());
        assert!(email.set_from("not an address").is_err());
    }

    #[test]
    fn build_message() {
        let mut email = Email::new();
        email.set_host_name("localhost");
        email
            .set_from(TEST_EMAIL)
            .unwrap()
            .add_to("ac@gmail.com")
            .unwrap()
            .add_bcc("bj@gmail.com")
            .unwrap()
            .add_cc("nah@gmail.com")
            .unwrap()
            .add_header("X-Title", "title")
            .unwrap()
            .set_subject("subject")
            .set_text_body("Hello");

        let message = email.build().unwrap();
        let body = String::from_utf8(message.body.to_vec()).unwrap();
        assert!(body.contains("Subject: subject"), "{}", body);
        assert!(body.contains("X-Title: title"), "{}", body);
        assert!(body.contains("Date: "), "{}", body);
        assert_eq!("jiji@hj.com", message.mail_from.email);
        assert_eq!(
            vec!["ac@gmail.com", "nah@gmail.com", "bj@gmail.com"],
            message
                .rcpt_to
                .iter()
                .map(|rcpt| rcpt.email.as_ref())
                .collect::<Vec<_>>()
        );
        assert!(email.message().is_some());
    }

    #[test]
    fn build_without_from() {
        let mut email = Email::new();
        email.set_host_name("localhost");
        email
            .add_header("X-Title", "title")
            .unwrap()
            .add_to("ac@gmail.com")
            .unwrap()
            .add_cc("nah@gmail.com")
            .unwrap()
            .set_subject("subject");

        let err = email.build().unwrap_err();
        assert_eq!("From address required", err.to_string());
    }

    #[test]
    fn build_without_recipients() {
        let mut email = Email::new();
        email.set_host_name("localhost");
        email.set_from(TEST_EMAIL).unwrap().set_subject("subject");

        let err = email.build().unwrap_err();
        assert_eq!("At least one receiver address required", err.to_string());
        assert!(matches!(err, Error::MissingRecipients));
    }

    #[test]
    fn build_twice() {
        let mut email = Email::new();
        email.set_host_name("localhost");
        email
            .set_from(TEST_EMAIL)
            .unwrap()
            .add_to("ac@gmail.com")
            .unwrap()
            .add_bcc("bj@gmail.com")
            .unwrap()
            .set_text_body("Hello");

        email.build().unwrap();

        let err = email.build().unwrap_err();
        assert_eq!("The message is already built", err.to_string());
        assert_eq!(ErrorKind::State, err.kind());
    }

    #[test]
    fn envelope_deduplicates() {
        let mut email = Email::new();
        email
            .set_from(TEST_EMAIL)
            .unwrap()
            .add_to("ac@gmail.com")
            .unwrap()
            .add_cc("ac@gmail.com")
            .unwrap()
            .add_bcc("bj@gmail.com")
            .unwrap();

        let message = email.build().unwrap();
        assert_eq!(2, message.rcpt_to.len());
        assert_eq!("ac@gmail.com", message.rcpt_to[0].email);
        assert_eq!("bj@gmail.com", message.rcpt_to[1].email);
    }

    #[test]
    fn sent_date() {
        let mut email = Email::new();
        assert_eq!(None, email.sent_date());

        let date = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 0).unwrap();
        email.set_sent_date(date);
        assert_eq!(Some(date), email.sent_date());
    }

    #[test]
    fn host_name() {
        let mut email = Email::new();
        assert_eq!(None, email.host_name());
        email.set_host_name("localhost");
        assert_eq!(Some("localhost"), email.host_name());
    }

    #[test]
    fn mail_session() {
        let mut email = Email::new();
        let err = email.mail_session().unwrap_err();
        assert_eq!(
            "Cannot find valid hostname for mail session",
            err.to_string()
        );
        assert_eq!(ErrorKind::Config, err.kind());

        email.set_host_name("localhost");
        let session = email.mail_session().unwrap();
        assert_eq!("localhost:25", session.addr);
        assert_eq!(Duration::from_secs(60), session.timeout);
    }

    #[test]
    fn session_settings() {
        let mut email = Email::new();
        assert_eq!(Duration::from_secs(60), email.timeout());

        email.set_timeout(Duration::from_secs(5));
        email.set_smtp_port(2525);
        email.set_host_name("localhost");
        assert_eq!(Duration::from_secs(5), email.timeout());
        assert_eq!(2525, email.smtp_port());

        let session = email.mail_session().unwrap();
        assert_eq!("localhost:2525", session.addr);
        assert_eq!(Duration::from_secs(5), session.timeout);
    }
}
