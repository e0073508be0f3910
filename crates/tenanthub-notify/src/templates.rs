//! Email message templates.
//!
//! Plain `format!` HTML, short enough to read in a client that strips
//! styling. All recipient-facing copy lives here.

/// Subject and HTML body pair.
#[derive(Debug, Clone)]
pub struct Message {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

/// Payment link email sent when an access request is approved.
pub fn payment_link(full_name: &str, plan: &str, checkout_url: &str) -> Message {
    Message {
        subject: "Your TenantHub access request was approved".to_string(),
        html: format!(
            "<p>Hi {full_name},</p>\
             <p>Your access request has been approved for the <strong>{plan}</strong> plan. \
             Complete your subscription to activate your account:</p>\
             <p><a href=\"{checkout_url}\">Complete payment</a></p>\
             <p>This link expires in 24 hours.</p>"
        ),
    }
}

/// Welcome email with credentials, sent after provisioning.
pub fn welcome(full_name: &str, email: &str, password: &str, dashboard_url: &str) -> Message {
    Message {
        subject: "Welcome to TenantHub - your account is ready".to_string(),
        html: format!(
            "<p>Hi {full_name},</p>\
             <p>Your account has been created. Sign in with:</p>\
             <ul><li>Email: <strong>{email}</strong></li>\
             <li>Temporary password: <code>{password}</code></li></ul>\
             <p>You will be asked to choose a new password at first sign-in.</p>\
             <p><a href=\"{dashboard_url}\">Open your dashboard</a></p>"
        ),
    }
}

/// Rejection notice sent when an access request is declined.
pub fn rejection(full_name: &str, reason: &str) -> Message {
    Message {
        subject: "Update on your TenantHub access request".to_string(),
        html: format!(
            "<p>Hi {full_name},</p>\
             <p>Thank you for your interest. We are unable to approve your access \
             request at this time.</p>\
             <p>Reason: {reason}</p>\
             <p>You are welcome to apply again in the future.</p>"
        ),
    }
}

/// Credential reset email, sent when an admin regenerates a password.
pub fn credentials_reset(full_name: &str, email: &str, password: &str, dashboard_url: &str) -> Message {
    Message {
        subject: "Your TenantHub credentials were reset".to_string(),
        html: format!(
            "<p>Hi {full_name},</p>\
             <p>An administrator reset your credentials. Sign in with:</p>\
             <ul><li>Email: <strong>{email}</strong></li>\
             <li>Temporary password: <code>{password}</code></li></ul>\
             <p>You will be asked to choose a new password at first sign-in.</p>\
             <p><a href=\"{dashboard_url}\">Open your dashboard</a></p>"
        ),
    }
}
