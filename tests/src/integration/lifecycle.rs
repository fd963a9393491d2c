//! Unit lifecycle choreography: intake through transfusion and expiry.

#[cfg(test)]
mod tests {
    use crate::support::{intake, register, service};
    use hb_inventory::{
        AvailabilityFilter, BloodBankApi, InventoryError, UnitStatus,
    };
    use shared_types::{BloodGroup, StorageLocation, UnitId};

    #[test]
    fn test_donation_to_transfusion_flow() {
        let bank = service();

        // Intake.
        let unit = register(&bank, BloodGroup::APos, "Main");
        assert_eq!(unit.status, UnitStatus::Available);
        assert_eq!(unit.version, 0);

        // Ward reserves it for a patient.
        let reserved = bank
            .transition_unit(unit.id, 0, UnitStatus::Reserved)
            .unwrap();
        assert_eq!(reserved.version, 1);

        // Transfusion administered: the clinical workflow marks it Used.
        let used = bank
            .transition_unit(unit.id, 1, UnitStatus::Used)
            .unwrap();
        assert_eq!(used.status, UnitStatus::Used);

        // Terminal: nothing further is legal.
        let result = bank.transition_unit(unit.id, 2, UnitStatus::Available);
        assert!(matches!(
            result,
            Err(InventoryError::IllegalTransition { .. })
        ));
    }

    #[test]
    fn test_expiry_sweep_end_to_end() {
        let bank = service();
        register(&bank, BloodGroup::BNeg, "Main");

        // Fresh stock shows up in the expiring-soon report only once the
        // horizon is wide enough.
        assert!(bank.expiring_within(7).is_empty());
        assert_eq!(bank.expiring_within(35).len(), 1);

        // Not due yet.
        assert_eq!(bank.sweep_expired(), 0);

        // Drive the clock past the shelf life and sweep.
        bank.clock().advance_days(36);
        assert_eq!(bank.sweep_expired(), 1);
        assert_eq!(bank.sweep_expired(), 0);
        assert!(bank.list_available(AvailabilityFilter::any()).is_empty());
    }

    #[test]
    fn test_age_buckets_report() {
        let bank = service();
        bank.register_unit(intake(BloodGroup::OPos, "Main", 2)).unwrap();
        bank.register_unit(intake(BloodGroup::OPos, "Main", 12)).unwrap();
        bank.register_unit(intake(BloodGroup::OPos, "Main", 30)).unwrap();

        let buckets = bank.age_buckets();
        assert_eq!(buckets.d0_7, 1);
        assert_eq!(buckets.d8_14, 1);
        assert_eq!(buckets.d29_35, 1);
        assert_eq!(buckets.total(), 3);
    }

    #[test]
    fn test_administrative_removal_is_audited() {
        let bank = service();
        let unit = register(&bank, BloodGroup::AbNeg, "Main");

        bank.remove_unit(unit.id, 0, "intake typo: duplicate of another entry")
            .unwrap();

        assert!(bank.get_unit(&unit.id).is_none());
        let audit = bank.corrections();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].unit, unit.id);
        assert_eq!(audit[0].blood_group, BloodGroup::AbNeg);
    }

    #[test]
    fn test_relocation_only_while_available() {
        let bank = service();
        let unit = register(&bank, BloodGroup::ONeg, "Main");

        let moved = bank
            .relocate_unit(unit.id, 0, StorageLocation::from("ICU"))
            .unwrap();
        assert_eq!(moved.location, StorageLocation::from("ICU"));

        bank.transition_unit(unit.id, 1, UnitStatus::Reserved)
            .unwrap();
        let pinned = bank.relocate_unit(unit.id, 2, StorageLocation::from("Lab"));
        assert!(matches!(
            pinned,
            Err(InventoryError::UnitNotAvailable { .. })
        ));
    }

    #[test]
    fn test_unknown_ids_surface_not_found() {
        let bank = service();
        let ghost = UnitId::new();

        assert!(bank.get_unit(&ghost).is_none());
        let result = bank.transition_unit(ghost, 0, UnitStatus::Reserved);
        assert_eq!(result.unwrap_err(), InventoryError::UnitNotFound(ghost));
    }

    #[test]
    fn test_summaries_track_the_flow() {
        let bank = service();
        let a = register(&bank, BloodGroup::APos, "Main");
        register(&bank, BloodGroup::APos, "ICU");

        bank.transition_unit(a.id, 0, UnitStatus::Reserved).unwrap();

        let by_group = bank.summary_by_group();
        let row = by_group[BloodGroup::APos.index()];
        assert_eq!((row.available, row.reserved, row.total), (1, 1, 2));

        let by_site = bank.summary_by_location();
        assert_eq!(by_site.len(), 2);
        let main = &by_site[&StorageLocation::from("Main")];
        assert_eq!(main[0].reserved, 1);
    }
}
