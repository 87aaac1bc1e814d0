//! Rendered transactional emails

use crate::domain::OutboundEmail;

const FOOTER: &str = "The TechHub Team";

fn html_shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: Arial, sans-serif; background-color: #f4f4f4; color: #333333; margin: 0; padding: 20px; text-align: center; }}
        .container {{ background-color: #ffffff; padding: 20px; border-radius: 8px; max-width: 600px; margin: 0 auto; }}
        .header {{ background-color: #ff6600; color: #ffffff; padding: 10px; border-radius: 8px 8px 0 0; }}
        .button {{ display: inline-block; padding: 10px 20px; font-size: 16px; color: #ffffff; background-color: #ff6600; text-decoration: none; border-radius: 5px; margin: 20px 0; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header"><h1>{title}</h1></div>
        {body}
        <p>{footer}</p>
    </div>
</body>
</html>"#,
        title = title,
        body = body,
        footer = FOOTER,
    )
}

/// Account verification email sent right after registration
pub fn account_verification(to_name: &str, to_email: &str, link: &str) -> OutboundEmail {
    let title = "Welcome to the Mentorship Program!";
    let body = format!(
        r#"<p>Hi there,</p>
        <p>Thank you for registering. To complete your registration, please verify your email address by clicking the button below:</p>
        <a href="{link}" class="button">Verify Your Account</a>
        <p>If the button doesn't work, please copy and paste the following link into your browser:</p>
        <p><a href="{link}">{link}</a></p>
        <p>Welcome aboard!</p>"#,
        link = link,
    );

    OutboundEmail {
        to_name: to_name.to_string(),
        to_email: to_email.to_string(),
        subject: "Verify your account".to_string(),
        text: format!(
            "{}\n\nHi there,\n\nThank you for registering. To complete your registration, \
             please verify your email address:\n\n{}\n\nWelcome aboard!\n\n{}\n",
            title, link, FOOTER
        ),
        html: html_shell(title, &body),
    }
}

/// Password reset email
pub fn password_reset(to_name: &str, to_email: &str, link: &str) -> OutboundEmail {
    let title = "Reset Your Password";
    let body = format!(
        r#"<p>Hi there,</p>
        <p>We received a request to reset your password. Click the button below to reset it:</p>
        <a href="{link}" class="button">Reset Password</a>
        <p>If the button doesn't work, please copy and paste the following link into your browser:</p>
        <p><a href="{link}">{link}</a></p>
        <p>If you didn't request a password reset, please ignore this email.</p>"#,
        link = link,
    );

    OutboundEmail {
        to_name: to_name.to_string(),
        to_email: to_email.to_string(),
        subject: "Reset your password".to_string(),
        text: format!(
            "{}\n\nHi there,\n\nWe received a request to reset your password:\n\n{}\n\n\
             If you didn't request a password reset, please ignore this email.\n\n{}\n",
            title, link, FOOTER
        ),
        html: html_shell(title, &body),
    }
}

/// Team invite email, sent both for registered receivers (login link) and
/// unregistered ones (registration link carrying the deferred token)
pub fn team_invite(
    to_email: &str,
    sender_name: &str,
    sender_email: &str,
    link: &str,
) -> OutboundEmail {
    let title = "You're Invited to Join a Team!";
    let body = format!(
        r#"<p>Hi there,</p>
        <p><strong>{name} ({email})</strong> has invited you to join their team.</p>
        <a href="{link}" class="button">Accept Invite</a>
        <p>If the button doesn't work, please copy and paste the following link into your browser:</p>
        <p><a href="{link}">{link}</a></p>
        <p>We look forward to seeing you collaborate!</p>"#,
        name = sender_name,
        email = sender_email,
        link = link,
    );

    OutboundEmail {
        to_name: to_email.to_string(),
        to_email: to_email.to_string(),
        subject: format!("{} invited you to join their team", sender_name),
        text: format!(
            "{}\n\nHi there,\n\n{} ({}) has invited you to join their team.\n\n\
             Accept the invite here: {}\n\n{}\n",
            title, sender_name, sender_email, link, FOOTER
        ),
        html: html_shell(title, &body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_email_carries_link() {
        let email = account_verification("Test", "t@example.com", "https://app/verify?token=abc");

        assert_eq!(email.to_email, "t@example.com");
        assert!(email.text.contains("https://app/verify?token=abc"));
        assert!(email.html.contains("https://app/verify?token=abc"));
    }

    #[test]
    fn test_invite_email_names_the_sender() {
        let email = team_invite("r@example.com", "Leader", "l@example.com", "https://app/login");

        assert!(email.subject.contains("Leader"));
        assert!(email.text.contains("l@example.com"));
        assert!(email.html.contains("Leader (l@example.com)"));
    }
}
