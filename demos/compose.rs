/*
 * Copyright Stalwart Labs Ltd.
 *
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 */

use mail_draft::Email;

fn main() {
    tracing_subscriber::fmt::init();

    // Compose a simple text message
    let mut email = Email::new();
    email
        .set_from(("John Doe", "john@example.com"))
        .unwrap()
        .add_to("jane@example.com")
        .unwrap()
        .add_cc(("James Smith", "james@test.com"))
        .unwrap()
        .add_header("X-Mailer", "mail-draft")
        .unwrap()
        .set_subject("Hello, world!")
        .set_text_body("Hello, world!");
    email.set_host_name("mail.smtp2go.com");
    email.set_smtp_port(2525);

    // Obtain the transport configuration for a delivery library
    let session = email.mail_session().unwrap();
    println!("session: {} (EHLO {})", session.addr, session.local_host);

    // Render the message
    let message = email.build().unwrap();
    println!("{}", String::from_utf8_lossy(&message.body));
}
