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

/// Transport configuration for a delivery library.
///
/// Carries everything a transport needs to open a connection for the built
/// message: the remote address, a timeout and the local host name to announce.
/// The session performs no I/O itself.
#[derive(Debug, Clone)]
pub struct Session<'x> {
    pub addr: String,
    pub host_name: Cow<'x, str>,
    pub port: u16,
    pub timeout: Duration,
    pub local_host: String,
}

impl<'x> Session<'x> {
    pub fn new(host_name: impl Into<Cow<'x, str>>, port: u16) -> Self {
        let host_name = host_name.into();
        Session {
            addr: format!("{}:{}", host_name, port),
            port,
            timeout: Duration::from_secs(60),
            local_host: gethostname::gethostname()
                .to_str()
                .unwrap_or("[127.0.0.1]")
                .to_string(),
            host_name,
        }
    }

    /// Sets the socket timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
