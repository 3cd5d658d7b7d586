use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use ulid::Ulid;

use crate::model::*;

use super::availability::{check_availability, check_availability_excluding};
use super::pricing::{Quote, price};

/// Outcome of vetting a proposed booking against one space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingCheck {
    Available { quote: Quote },
    /// The space is closed to booking or not in service.
    NotBookable { status: SpaceStatus, allow_booking: bool },
    PastDate,
    Conflict { conflicting_booking_ids: Vec<Ulid> },
    /// Shorter than the space's minimum booking length.
    TooShort { minimum_hours: Decimal },
}

impl BookingCheck {
    pub fn is_available(&self) -> bool {
        matches!(self, BookingCheck::Available { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingCheck::Available { .. } => "available",
            BookingCheck::NotBookable { .. } => "not_bookable",
            BookingCheck::PastDate => "past_date",
            BookingCheck::Conflict { .. } => "conflict",
            BookingCheck::TooShort { .. } => "too_short",
        }
    }
}

/// Vet `candidate` on `date` for `resource`. Rules apply in order and the
/// first failure is returned: bookable gate, past date, conflicts, minimum
/// length. A passing candidate carries its price.
pub fn check_booking(
    resource: &Resource,
    date: NaiveDate,
    today: NaiveDate,
    candidate: &Span,
    bookings: &[Booking],
    exclude: Option<Ulid>,
) -> BookingCheck {
    if !resource.is_bookable() {
        return BookingCheck::NotBookable {
            status: resource.status,
            allow_booking: resource.allow_booking,
        };
    }
    if date < today {
        return BookingCheck::PastDate;
    }

    let result = match exclude {
        Some(id) => check_availability_excluding(resource.id, date, candidate, bookings, id),
        None => check_availability(resource.id, date, candidate, bookings),
    };
    if !result.available {
        return BookingCheck::Conflict {
            conflicting_booking_ids: result.conflicting_booking_ids,
        };
    }

    let booked_hours = Decimal::from(candidate.duration()) / Decimal::from(60);
    if resource.min_booking_hours > Decimal::ZERO && booked_hours < resource.min_booking_hours {
        return BookingCheck::TooShort {
            minimum_hours: resource.min_booking_hours,
        };
    }

    BookingCheck::Available {
        quote: price(candidate, resource, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RateType;

    const H: Minutes = 60;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn space() -> Resource {
        Resource {
            id: Ulid::new(),
            name: "Board Room".into(),
            kind: "Meeting Room".into(),
            capacity: 10,
            hourly_rate: Decimal::from(40),
            daily_rate: Decimal::from(250),
            location: Some("Riyadh".into()),
            status: SpaceStatus::Available,
            allow_booking: true,
            min_booking_hours: Decimal::ZERO,
            minimum_charge: Decimal::ZERO,
        }
    }

    fn booking(resource_id: Ulid, start: Minutes, end: Minutes) -> Booking {
        Booking {
            id: Ulid::new(),
            resource_id,
            date: today(),
            start,
            end,
            status: BookingStatus::Confirmed,
            expires_at: None,
            tenant_id: Ulid::new(),
            tenant_name: None,
        }
    }

    fn span(start: Minutes, end: Minutes) -> Span {
        Span::new(start, end).unwrap()
    }

    #[test]
    fn open_slot_is_priced() {
        let room = space();
        let check = check_booking(&room, today(), today(), &span(10 * H, 12 * H), &[], None);
        assert_eq!(
            check,
            BookingCheck::Available {
                quote: Quote {
                    rate: RateType::Hourly,
                    hours: Decimal::from(2),
                    subtotal: Decimal::from(80),
                }
            }
        );
        assert!(check.is_available());
    }

    #[test]
    fn full_day_is_quoted_daily() {
        let room = space();
        let BookingCheck::Available { quote } = check_booking(&room, today(), today(), &span(9 * H, 17 * H), &[], None)
        else {
            panic!("expected available");
        };
        assert_eq!(quote.rate, RateType::Daily);
        assert_eq!(quote.subtotal, Decimal::from(250));
    }

    #[test]
    fn closed_or_out_of_service_space_is_not_bookable() {
        let closed = Resource {
            allow_booking: false,
            ..space()
        };
        assert_eq!(
            check_booking(&closed, today(), today(), &span(10 * H, 11 * H), &[], None),
            BookingCheck::NotBookable {
                status: SpaceStatus::Available,
                allow_booking: false,
            }
        );
        for status in [SpaceStatus::Rented, SpaceStatus::Maintenance, SpaceStatus::Occupied] {
            let room = Resource { status, ..space() };
            let check = check_booking(&room, today(), today(), &span(10 * H, 11 * H), &[], None);
            assert_eq!(check.label(), "not_bookable", "{status:?}");
        }
    }

    #[test]
    fn past_dates_are_rejected() {
        let room = space();
        let yesterday = today().pred_opt().unwrap();
        assert_eq!(
            check_booking(&room, yesterday, today(), &span(10 * H, 11 * H), &[], None),
            BookingCheck::PastDate
        );
    }

    #[test]
    fn overlap_reports_conflicts_unless_editing_itself() {
        let room = space();
        let held = booking(room.id, 10 * H, 11 * H);
        let candidate = span(10 * H + 30, 11 * H + 30);
        assert_eq!(
            check_booking(&room, today(), today(), &candidate, &[held.clone()], None),
            BookingCheck::Conflict {
                conflicting_booking_ids: vec![held.id],
            }
        );
        assert!(check_booking(&room, today(), today(), &candidate, &[held.clone()], Some(held.id)).is_available());
    }

    #[test]
    fn shorter_than_minimum_is_rejected() {
        let room = Resource {
            min_booking_hours: Decimal::from(2),
            ..space()
        };
        assert_eq!(
            check_booking(&room, today(), today(), &span(10 * H, 11 * H + 30), &[], None),
            BookingCheck::TooShort {
                minimum_hours: Decimal::from(2),
            }
        );
        assert!(check_booking(&room, today(), today(), &span(10 * H, 12 * H), &[], None).is_available());
    }

    #[test]
    fn conflict_is_reported_before_length() {
        let room = Resource {
            min_booking_hours: Decimal::from(4),
            ..space()
        };
        let held = booking(room.id, 10 * H, 11 * H);
        let check = check_booking(&room, today(), today(), &span(10 * H, 11 * H), &[held], None);
        assert_eq!(check.label(), "conflict");
    }

    #[test]
    fn outcome_serializes_tagged() {
        let json = serde_json::to_value(BookingCheck::TooShort {
            minimum_hours: Decimal::from(2),
        })
        .unwrap();
        assert_eq!(json["outcome"], "too_short");
        assert_eq!(json["minimum_hours"], "2");
    }
}
