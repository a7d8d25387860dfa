//! Tests for the strongly-typed identifiers

use core_kernel::{DunningEventId, InvoiceId, ReminderId};
use uuid::Uuid;

mod invoice_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(InvoiceId::new(), InvoiceId::new());
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = InvoiceId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = InvoiceId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = InvoiceId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
        assert_eq!(Uuid::from(id), uuid);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("INV-not-a-uuid".parse::<InvoiceId>().is_err());
    }
}

mod display_tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(InvoiceId::prefix(), "INV");
        assert_eq!(ReminderId::prefix(), "REM");
        assert_eq!(DunningEventId::prefix(), "EVT");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let id = DunningEventId::new();
        let parsed: DunningEventId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}

mod serde_tests {
    use super::*;

    #[test]
    fn test_serializes_as_bare_uuid() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&ReminderId::from(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}
