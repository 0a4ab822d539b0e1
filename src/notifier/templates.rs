//! HTML email templates for the three notification flows: tenant welcome,
//! monthly payment reminder, and owner replies to offers.

use crate::notifier::EmailMessage;
use chrono::NaiveDate;

/// Welcome email sent when a tenant is added to a property, carrying the
/// payment details they signed up for. Sent in the owner's name.
pub fn welcome_email(
    tenant_name: &str,
    tenant_email: &str,
    monthly_amount: f64,
    due_day: i64,
    street: &str,
    street_number: &str,
    owner_name: &str,
) -> EmailMessage {
    let html = format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif; background-color: #f9f9f9;">
    <div style="max-width: 600px; margin: 0 auto; background-color: white; padding: 30px; border-radius: 10px;">
      <h1 style="color: #333;">Welcome, {tenant_name}!</h1>
      <p style="color: #666; font-size: 16px;">You have been added to the house manager. Here are your payment details:</p>
      <div style="background-color: #e8f4f8; padding: 25px; border-radius: 10px; margin: 20px 0; border-left: 5px solid #0099cc;">
        <h2 style="color: #0099cc; margin-top: 0;">Payment details</h2>
        <p style="margin: 10px 0;"><strong>Property:</strong> {street}, {street_number}</p>
        <p style="margin: 10px 0;"><strong>Monthly amount:</strong> EUR {monthly_amount:.2}</p>
        <p style="margin: 10px 0;"><strong>Due day:</strong> day {due_day} of every month</p>
      </div>
      <div style="background-color: #fff3cd; padding: 20px; border-radius: 10px; border-left: 5px solid #ffc107;">
        <p style="color: #666;">Payment is due on <strong>day {due_day} of every month</strong>. You will receive an automatic reminder when the date comes around.</p>
      </div>
      <hr style="border: none; border-top: 2px solid #eee; margin: 30px 0;">
      <p style="color: #999; font-size: 12px; text-align: center;">Automatic message from the house manager</p>
    </div>
  </body>
</html>"#
    );

    EmailMessage {
        to: tenant_email.to_string(),
        subject: format!("Welcome to the house manager - {}", street),
        html,
        sender_name: Some(owner_name.to_string()),
    }
}

/// Monthly payment reminder sent on the tenant's due day
pub fn payment_reminder_email(
    tenant_name: &str,
    tenant_email: &str,
    monthly_amount: f64,
    street: &str,
    today: NaiveDate,
) -> EmailMessage {
    let html = format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif;">
    <h2>Hi {tenant_name}!</h2>
    <p>Your payment day has arrived.</p>
    <div style="background-color: #f0f0f0; padding: 20px; border-radius: 10px; margin: 20px 0;">
      <h3>Amount due: EUR {monthly_amount:.2}</h3>
      <p><strong>Property:</strong> {street}</p>
      <p><strong>Date:</strong> {date}</p>
    </div>
    <p>Remember to make your payment!</p>
    <hr>
    <p><small>Automatic message from the house manager</small></p>
  </body>
</html>"#,
        date = today.format("%d/%m/%Y"),
    );

    EmailMessage {
        to: tenant_email.to_string(),
        subject: format!("Reminder: payment due - {}", street),
        html,
        sender_name: None,
    }
}

/// Notification to a bidder when the owner answers their offer
pub fn offer_reply_email(
    bidder_email: &str,
    owner_name: &str,
    street: &str,
    reply_text: &str,
) -> EmailMessage {
    let html = format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif;">
    <h2>Hi!</h2>
    <p>The owner <strong>{owner_name}</strong> answered your offer for <strong>{street}</strong>.</p>
    <div style="background:#f8f9fa;padding:15px;border-radius:8px;margin:15px 0;">
      <strong>Reply:</strong>
      <p>{reply_text}</p>
    </div>
    <p>Log in to the house manager to see all your notifications.</p>
    <hr>
    <p style="font-size:12px;color:#888;">Automatic message from the house manager</p>
  </body>
</html>"#
    );

    EmailMessage {
        to: bidder_email.to_string(),
        subject: format!("Reply to your offer for {}", street),
        html,
        sender_name: Some(owner_name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_email_contents() {
        let msg = welcome_email(
            "Mario Rossi",
            "mario@example.com",
            450.0,
            5,
            "Via Roma",
            "12",
            "Anna Bianchi",
        );

        assert_eq!(msg.to, "mario@example.com");
        assert!(msg.subject.contains("Via Roma"));
        assert!(msg.html.contains("EUR 450.00"));
        assert!(msg.html.contains("day 5 of every month"));
        assert_eq!(msg.sender_name.as_deref(), Some("Anna Bianchi"));
    }

    #[test]
    fn test_payment_reminder_contents() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let msg = payment_reminder_email("Mario", "mario@example.com", 450.5, "Via Roma", today);

        assert!(msg.subject.contains("payment due"));
        assert!(msg.html.contains("EUR 450.50"));
        assert!(msg.html.contains("05/08/2026"));
        assert!(msg.sender_name.is_none());
    }

    #[test]
    fn test_offer_reply_contents() {
        let msg = offer_reply_email("bidder@example.com", "Anna", "Via Roma", "Still available");

        assert_eq!(msg.to, "bidder@example.com");
        assert!(msg.html.contains("Still available"));
        assert!(msg.html.contains("Anna"));
        assert_eq!(msg.sender_name.as_deref(), Some("Anna"));
    }
}
