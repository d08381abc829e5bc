/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use num_enum::{FromPrimitive, IntoPrimitive};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
pub enum SafetyLevel {
    Safe = 1,
    Moderate = 2,
    Restricted = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
pub enum ContentType {
    Photo = 1,
    Screenshot = 2,
    Other = 3,
}

/// Whether an upload shows up in global search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
pub enum HiddenLevel {
    Visible = 1,
    Hidden = 2,
}

/// Lifecycle state of an asynchronous upload ticket.
///
/// `Completed`, `Failed` and `Replaced` are terminal. `Unknown` is a status code this
/// library does not recognise; the ticket should simply be polled again later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum TicketStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    Replaced,
    Unknown,
}

impl TicketStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TicketStatus::Completed | TicketStatus::Failed | TicketStatus::Replaced
        )
    }
}

/// Numeric `complete` code delivered by `flickr.photos.upload.checkTickets`
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u32)]
pub enum TicketCode {
    Pending = 0,
    Completed = 1,
    Failed = 2,
    Replaced = 3,
    #[num_enum(catch_all)]
    Unrecognized(u32),
}

impl From<TicketCode> for TicketStatus {
    fn from(code: TicketCode) -> Self {
        match code {
            TicketCode::Pending => TicketStatus::InProgress,
            TicketCode::Completed => TicketStatus::Completed,
            TicketCode::Failed => TicketStatus::Failed,
            TicketCode::Replaced => TicketStatus::Replaced,
            TicketCode::Unrecognized(_) => TicketStatus::Unknown,
        }
    }
}

/// Size variants the API can return urls and dimensions for (see `extras=url_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum PhotoSize {
    #[strum(serialize = "sq")]
    Square,
    #[strum(serialize = "q")]
    LargeSquare,
    #[strum(serialize = "t")]
    Thumbnail,
    #[strum(serialize = "s")]
    Small,
    #[strum(serialize = "n")]
    Small320,
    #[strum(serialize = "m")]
    Medium,
    #[strum(serialize = "z")]
    Medium640,
    #[strum(serialize = "c")]
    Medium800,
    #[strum(serialize = "l")]
    Large,
    #[strum(serialize = "o")]
    Original,
}

impl PhotoSize {
    /// Suffix used in the `url_`, `width_` and `height_` field names
    pub fn suffix(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ticket_codes_map_to_states() {
        assert_eq!(TicketStatus::from(TicketCode::from(0)), TicketStatus::InProgress);
        assert_eq!(TicketStatus::from(TicketCode::from(1)), TicketStatus::Completed);
        assert_eq!(TicketStatus::from(TicketCode::from(2)), TicketStatus::Failed);
        assert_eq!(TicketStatus::from(TicketCode::from(3)), TicketStatus::Replaced);
        assert_eq!(TicketCode::from(999), TicketCode::Unrecognized(999));
        assert_eq!(TicketStatus::from(TicketCode::from(999)), TicketStatus::Unknown);
    }

    #[test]
    fn ticket_status_names() {
        assert_eq!(TicketStatus::InProgress.to_string(), "inProgress");
        assert_eq!(TicketStatus::from_str("completed").unwrap(), TicketStatus::Completed);
        assert!(TicketStatus::Replaced.is_terminal());
        assert!(!TicketStatus::Unknown.is_terminal());
        assert!(!TicketStatus::Queued.is_terminal());
    }

    #[test]
    fn upload_levels_are_wire_numbers() {
        assert_eq!(u8::from(SafetyLevel::Restricted), 3);
        assert_eq!(u8::from(ContentType::Screenshot), 2);
        assert_eq!(u8::from(HiddenLevel::Hidden), 2);
        assert_eq!(PhotoSize::Medium640.suffix(), "z");
    }
}
