//! Plain-text message bodies for every notification the platform sends.
//! Each builder returns `(subject, body)`.

use chrono::NaiveDate;

/// Details of a freshly created booking, for the admin alert.
pub struct NewBookingAlert<'a> {
    /// Title of the booked package.
    pub package_title: &'a str,
    /// Name of the lead traveller.
    pub contact_name: &'a str,
    /// E-mail of the lead traveller.
    pub contact_email: &'a str,
    /// Phone of the lead traveller.
    pub contact_phone: &'a str,
    /// First day of travel.
    pub start_date: NaiveDate,
    /// Last day of travel.
    pub end_date: NaiveDate,
    /// Number of travellers on the booking.
    pub travellers: i64,
    /// Total amount at creation time.
    pub total_amount: i64,
    /// Currency of the total.
    pub currency: &'a str,
    /// Free-text requests from the customer, if any.
    pub special_requests: Option<&'a str>,
}

/// Admin alert for a new booking request.
pub fn new_booking_alert(details: &NewBookingAlert<'_>) -> (String, String) {
    let subject = format!("New Booking: {}", details.package_title);

    let mut body = format!(
        "New booking request\n\n\
         Package: {}\n\
         Customer: {}\n\
         Email: {}\n\
         Phone: {}\n\
         Dates: {} to {}\n\
         Travellers: {}\n\
         Total: {} {}\n",
        details.package_title,
        details.contact_name,
        details.contact_email,
        details.contact_phone,
        details.start_date.format("%B %d, %Y"),
        details.end_date.format("%B %d, %Y"),
        details.travellers,
        details.total_amount,
        details.currency,
    );

    if let Some(requests) = details.special_requests {
        body.push_str(&format!("Special requests: {}\n", requests));
    }

    body.push_str("\nPlease log in to the dashboard to approve or reject this booking.\n");

    (subject, body)
}

/// Customer-facing notice that a booking's status changed.
pub fn booking_status_update(
    lead_name: &str,
    package_title: &str,
    new_status: &str,
) -> (String, String) {
    let subject = format!("Update on your booking: {}", package_title);

    let mut status_display = new_status.to_string();
    if let Some(first) = status_display.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    let body = format!(
        "Hello {},\n\n\
         The status of your booking for {} has been updated.\n\
         New status: {}\n\n\
         If you have any questions, please reply to this email.\n\n\
         Best regards,\nSouthern Trails Team\n",
        lead_name, package_title, status_display,
    );

    (subject, body)
}

/// Staff reminder that a pending booking is about to start.
pub fn pending_booking_reminder(
    package_title: &str,
    start_date: NaiveDate,
    days_left: i64,
    lead_name: Option<&str>,
    lead_email: Option<&str>,
    lead_phone: Option<&str>,
) -> (String, String) {
    let subject = format!("Action Required: Booking Reminder ({} days left)", days_left);

    let body = format!(
        "Booking approval reminder\n\n\
         The following booking is starting in {} day(s) and is still PENDING.\n\n\
         Package: {}\n\
         Start date: {}\n\n\
         Customer details\n\
         Name: {}\n\
         Email: {}\n\
         Phone: {}\n\n\
         Please log in to the dashboard to approve or reject this booking immediately.\n",
        days_left,
        package_title,
        start_date.format("%B %d, %Y"),
        lead_name.unwrap_or("N/A"),
        lead_email.unwrap_or("N/A"),
        lead_phone.unwrap_or("N/A"),
    );

    (subject, body)
}

/// Admin alert for a new inquiry.
pub fn new_inquiry_alert(
    full_name: &str,
    email: &str,
    phone: Option<&str>,
    package_title: Option<&str>,
    message: &str,
) -> (String, String) {
    let subject = format!("New Inquiry: {}", full_name);

    let body = format!(
        "New inquiry received\n\n\
         Name: {}\n\
         Email: {}\n\
         Phone: {}\n\
         Package: {}\n\n\
         Message:\n{}\n",
        full_name,
        email,
        phone.unwrap_or("N/A"),
        package_title.unwrap_or("General"),
        message,
    );

    (subject, body)
}

/// Contact-form relay to the support address. The visitor's address goes in
/// the body so staff can reply directly.
pub fn contact_message(
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> (String, String) {
    let full_subject = format!("New Contact Form Submission: {}", subject);

    let body = format!(
        "New message from {}\n\n\
         Email: {}\n\
         Subject: {}\n\n\
         Message:\n{}\n",
        name, email, subject, message,
    );

    (full_subject, body)
}

/// One-time passcode delivery to the oversight address. The registrant never
/// receives this message.
pub fn admin_registration_otp(
    registrant_name: &str,
    registrant_email: &str,
    code: &str,
) -> (String, String) {
    let subject = format!("Admin Registration OTP for {}", registrant_name);

    let body = format!(
        "A new admin registration has been initiated.\n\n\
         Registrant name: {}\n\
         Registrant email: {}\n\n\
         OTP: {}\n\n\
         This OTP expires in 10 minutes.\n",
        registrant_name, registrant_email, code,
    );

    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_update_capitalizes_the_status() {
        let (_, body) = booking_status_update("Priya", "Kerala Backwaters", "confirmed");
        assert!(body.contains("New status: Confirmed"));
    }

    #[test]
    fn reminder_falls_back_for_missing_lead_contact() {
        let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let (subject, body) =
            pending_booking_reminder("Kerala Backwaters", start, 3, None, None, None);

        assert!(subject.contains("3 days left"));
        assert!(body.contains("Name: N/A"));
        assert!(body.contains("PENDING"));
    }

    #[test]
    fn contact_message_carries_reply_address() {
        let (subject, body) = contact_message(
            "Priya Nair",
            "priya@example.com",
            "Honeymoon packages",
            "Do you have availability in December?",
        );

        assert_eq!(subject, "New Contact Form Submission: Honeymoon packages");
        assert!(body.contains("Email: priya@example.com"));
        assert!(body.contains("Do you have availability in December?"));
    }

    #[test]
    fn booking_alert_includes_special_requests_only_when_present() {
        let details = NewBookingAlert {
            package_title: "Kerala Backwaters",
            contact_name: "Priya",
            contact_email: "priya@example.com",
            contact_phone: "+911234567890",
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 6).unwrap(),
            travellers: 2,
            total_amount: 370000,
            currency: "INR",
            special_requests: None,
        };

        let (_, body) = new_booking_alert(&details);
        assert!(!body.contains("Special requests"));
        assert!(body.contains("Total: 370000 INR"));

        let with_requests = NewBookingAlert {
            special_requests: Some("Vegetarian meals"),
            ..details
        };
        let (_, body) = new_booking_alert(&with_requests);
        assert!(body.contains("Special requests: Vegetarian meals"));
    }
}
