use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::model::*;

/// Narrows which spaces a calendar or availability request covers.
///
/// A named `space` wins outright; otherwise `location` and `space_type`
/// must both match when set. The empty filter keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFilter {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub space_type: Option<String>,
    #[serde(default)]
    pub space: Option<Ulid>,
}

impl CalendarFilter {
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.space_type.is_none() && self.space.is_none()
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        if let Some(id) = self.space {
            return resource.id == id;
        }
        let location_ok = self
            .location
            .as_deref()
            .is_none_or(|l| resource.location.as_deref() == Some(l));
        let type_ok = self.space_type.as_deref().is_none_or(|t| resource.kind == t);
        location_ok && type_ok
    }

    /// Keep the matching resources, order preserved.
    pub fn resources(&self, mut resources: Vec<Resource>) -> Vec<Resource> {
        if !self.is_empty() {
            resources.retain(|r| self.matches(r));
        }
        resources
    }

    /// Keep the bookings held on `resources`, typically the output of [`Self::resources`].
    pub fn bookings(&self, mut bookings: Vec<Booking>, resources: &[Resource]) -> Vec<Booking> {
        if self.is_empty() {
            return bookings;
        }
        let kept: HashSet<Ulid> = resources.iter().map(|r| r.id).collect();
        bookings.retain(|b| kept.contains(&b.resource_id));
        bookings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn space(name: &str, kind: &str, location: Option<&str>) -> Resource {
        Resource {
            id: Ulid::new(),
            name: name.into(),
            kind: kind.into(),
            capacity: 1,
            hourly_rate: Decimal::from(10),
            daily_rate: Decimal::ZERO,
            location: location.map(Into::into),
            status: SpaceStatus::Available,
            allow_booking: true,
            min_booking_hours: Decimal::ZERO,
            minimum_charge: Decimal::ZERO,
        }
    }

    fn booking(resource_id: Ulid) -> Booking {
        Booking {
            id: Ulid::new(),
            resource_id,
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            start: 600,
            end: 660,
            status: BookingStatus::Confirmed,
            expires_at: None,
            tenant_id: Ulid::new(),
            tenant_name: None,
        }
    }

    fn names(resources: &[Resource]) -> Vec<&str> {
        resources.iter().map(|r| r.name.as_str()).collect()
    }

    fn fixture() -> Vec<Resource> {
        vec![
            space("A", "Meeting Room", Some("Riyadh")),
            space("B", "Hot Desk", Some("Riyadh")),
            space("C", "Meeting Room", Some("Jeddah")),
            space("D", "Meeting Room", None),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let all = fixture();
        let filter = CalendarFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.resources(all.clone()), all);
        let orphan = booking(Ulid::new());
        assert_eq!(filter.bookings(vec![orphan.clone()], &[]), vec![orphan]);
    }

    #[test]
    fn location_and_type_combine() {
        let all = fixture();
        let by_location = CalendarFilter {
            location: Some("Riyadh".into()),
            ..Default::default()
        };
        assert_eq!(names(&by_location.resources(all.clone())), vec!["A", "B"]);

        let by_type = CalendarFilter {
            space_type: Some("Meeting Room".into()),
            ..Default::default()
        };
        assert_eq!(names(&by_type.resources(all.clone())), vec!["A", "C", "D"]);

        let both = CalendarFilter {
            location: Some("Riyadh".into()),
            space_type: Some("Meeting Room".into()),
            space: None,
        };
        assert_eq!(names(&both.resources(all)), vec!["A"]);
    }

    #[test]
    fn named_space_overrides_other_fields() {
        let all = fixture();
        let filter = CalendarFilter {
            location: Some("Jeddah".into()),
            space_type: None,
            space: Some(all[1].id),
        };
        assert_eq!(names(&filter.resources(all)), vec!["B"]);
    }

    #[test]
    fn no_match_leaves_nothing() {
        let all = fixture();
        let filter = CalendarFilter {
            location: Some("Dammam".into()),
            ..Default::default()
        };
        let kept = filter.resources(all.clone());
        assert!(kept.is_empty());
        let bookings: Vec<Booking> = all.iter().map(|r| booking(r.id)).collect();
        assert!(filter.bookings(bookings, &kept).is_empty());
    }

    #[test]
    fn bookings_follow_kept_spaces() {
        let all = fixture();
        let filter = CalendarFilter {
            location: Some("Riyadh".into()),
            ..Default::default()
        };
        let kept = filter.resources(all.clone());
        let bookings: Vec<Booking> = all.iter().map(|r| booking(r.id)).collect();
        let ids: Vec<Ulid> = filter.bookings(bookings, &kept).iter().map(|b| b.resource_id).collect();
        assert_eq!(ids, vec![all[0].id, all[1].id]);
    }

    #[test]
    fn deserializes_partial() {
        let filter: CalendarFilter = serde_json::from_str(r#"{"space_type": "Hot Desk"}"#).unwrap();
        assert_eq!(filter.space_type.as_deref(), Some("Hot Desk"));
        assert_eq!(filter.location, None);
    }
}
