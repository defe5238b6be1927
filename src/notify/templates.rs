//! Message text for each lending event.

use crate::{models::user::User, utils::qr};

use super::{Attachment, OutgoingEmail};

fn plain(to: &str, subject: impl Into<String>, body: String) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: subject.into(),
        body,
        attachment: None,
    }
}

/// Tells the owner who took their book, with the pickup code attached.
pub fn borrowed(
    owner: &User,
    borrower: &User,
    title: &str,
    qr_svg: Option<String>,
) -> OutgoingEmail {
    let body = format!(
        "{} (Class {}, Roll No. {}) has borrowed your book '{title}'.\n\n\
         Please bring it to your class during lunch break.",
        borrower.name,
        borrower.class_label(),
        borrower.roll_no
    );
    OutgoingEmail {
        attachment: qr_svg.map(|svg| Attachment {
            file_name: qr::attachment_name(title),
            content_type: "image/svg+xml".to_string(),
            bytes: svg.into_bytes(),
        }),
        ..plain(&owner.email, "📚 Your book was borrowed!", body)
    }
}

pub fn returned(owner: &User, title: &str, borrower_name: &str) -> OutgoingEmail {
    plain(
        &owner.email,
        "📤 Your book was returned",
        format!("{title} was returned by {borrower_name}"),
    )
}

pub fn due_soon(borrower: &User, owner: &User, title: &str) -> OutgoingEmail {
    plain(
        &borrower.email,
        "📅 Reminder: Book due tomorrow!",
        format!(
            "Please return '{title}' to {} (Class: {}, Division: {}) during lunch break.",
            owner.name, owner.class_name, owner.division
        ),
    )
}

pub fn overdue_to_borrower(borrower: &User, owner: &User, title: &str) -> OutgoingEmail {
    plain(
        &borrower.email,
        "⏰ Overdue Book Alert!",
        format!(
            "You are late returning '{title}'! Please return it to {} immediately.",
            owner.name
        ),
    )
}

pub fn overdue_to_owner(owner: &User, borrower: &User, title: &str) -> OutgoingEmail {
    plain(
        &owner.email,
        "⏰ Your Book is Overdue!",
        format!(
            "'{title}' is overdue. Borrower: {} ({}).",
            borrower.name,
            borrower.class_label()
        ),
    )
}

pub fn recommendation(
    friend_email: &str,
    recommender: &str,
    title: &str,
    author: &str,
) -> OutgoingEmail {
    plain(
        friend_email,
        format!("Book Recommendation: {title}"),
        format!("📚 {recommender} recommends you check out this book: '{title}' by {author}!"),
    )
}
