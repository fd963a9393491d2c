//! Transfer choreography: admission, dispatch, atomic completion, aborts.

#[cfg(test)]
mod tests {
    use crate::support::{register, service};
    use hb_inventory::{BloodBankApi, InventoryError, TransferStatus, UnitStatus};
    use shared_types::{BloodGroup, StaffId, StorageLocation};

    fn main_loc() -> StorageLocation {
        StorageLocation::from("Main")
    }

    fn icu() -> StorageLocation {
        StorageLocation::from("ICU")
    }

    #[test]
    fn test_full_transfer_choreography() {
        let bank = service();
        let a = register(&bank, BloodGroup::APos, "Main");
        let b = register(&bank, BloodGroup::ONeg, "Main");

        let transfer = bank
            .request_transfer(main_loc(), icu(), vec![a.id, b.id], StaffId::new())
            .unwrap();
        assert_eq!(transfer.status, TransferStatus::Requested);

        let dispatched = bank
            .dispatch_transfer(transfer.id, StaffId::new())
            .unwrap();
        assert_eq!(dispatched.status, TransferStatus::InTransit);
        assert!(dispatched.dispatched_at.is_some());

        let done = bank.complete_transfer(transfer.id).unwrap();
        assert_eq!(done.status, TransferStatus::Completed);
        assert!(done.closed_at.is_some());

        // Every unit arrived; versions were bumped by the relocation.
        for id in [a.id, b.id] {
            let unit = bank.get_unit(&id).unwrap();
            assert_eq!(unit.location, icu());
            assert_eq!(unit.status, UnitStatus::Available);
            assert_eq!(unit.version, 1);
        }
    }

    #[test]
    fn test_misplaced_unit_rejects_whole_request() {
        let bank = service();
        let lab_unit = register(&bank, BloodGroup::APos, "Lab");

        let result =
            bank.request_transfer(main_loc(), icu(), vec![lab_unit.id], StaffId::new());
        assert!(matches!(
            result,
            Err(InventoryError::UnitLocationMismatch { .. })
        ));

        // No transfer record came into existence.
        assert!(bank.transfers_by_status(TransferStatus::Requested).is_empty());
        assert!(bank.transfers_by_status(TransferStatus::Cancelled).is_empty());
    }

    #[test]
    fn test_reserved_stock_cannot_be_transferred() {
        let bank = service();
        let unit = register(&bank, BloodGroup::APos, "Main");
        bank.transition_unit(unit.id, 0, UnitStatus::Reserved)
            .unwrap();

        let result = bank.request_transfer(main_loc(), icu(), vec![unit.id], StaffId::new());
        assert!(matches!(
            result,
            Err(InventoryError::UnitNotAvailable { .. })
        ));
    }

    #[test]
    fn test_double_booking_a_unit_is_rejected() {
        let bank = service();
        let unit = register(&bank, BloodGroup::APos, "Main");

        let first = bank
            .request_transfer(main_loc(), icu(), vec![unit.id], StaffId::new())
            .unwrap();

        let second = bank.request_transfer(
            main_loc(),
            StorageLocation::from("Lab"),
            vec![unit.id],
            StaffId::new(),
        );
        assert_eq!(
            second.unwrap_err(),
            InventoryError::UnitAlreadyInTransfer {
                unit: unit.id,
                transfer: first.id,
            }
        );

        // Cancelling the first frees the unit for a new transfer.
        bank.cancel_transfer(first.id).unwrap();
        assert!(bank
            .request_transfer(main_loc(), icu(), vec![unit.id], StaffId::new())
            .is_ok());
    }

    #[test]
    fn test_completion_aborts_atomically_when_raced_by_fulfillment() {
        let bank = service();
        let a = register(&bank, BloodGroup::APos, "Main");
        let b = register(&bank, BloodGroup::APos, "Main");

        let transfer = bank
            .request_transfer(main_loc(), icu(), vec![a.id, b.id], StaffId::new())
            .unwrap();

        // Mid-transfer units are still Available, so a fulfillment may
        // legitimately reserve one before the clerk confirms arrival.
        bank.transition_unit(b.id, 0, UnitStatus::Reserved).unwrap();

        let result = bank.complete_transfer(transfer.id);
        assert_eq!(
            result.unwrap_err(),
            InventoryError::TransferAborted {
                transfer: transfer.id,
                unit: b.id,
            }
        );

        // All-or-nothing: neither unit moved, the transfer is Cancelled.
        assert_eq!(bank.get_unit(&a.id).unwrap().location, main_loc());
        assert_eq!(bank.get_unit(&b.id).unwrap().location, main_loc());
        assert_eq!(
            bank.get_transfer(&transfer.id).unwrap().status,
            TransferStatus::Cancelled
        );

        // And the surviving unit is free for a fresh transfer.
        assert!(bank
            .request_transfer(main_loc(), icu(), vec![a.id], StaffId::new())
            .is_ok());
    }

    #[test]
    fn test_terminal_transfers_reject_further_operations() {
        let bank = service();
        let unit = register(&bank, BloodGroup::APos, "Main");

        let transfer = bank
            .request_transfer(main_loc(), icu(), vec![unit.id], StaffId::new())
            .unwrap();
        bank.complete_transfer(transfer.id).unwrap();

        for result in [
            bank.complete_transfer(transfer.id),
            bank.cancel_transfer(transfer.id),
            bank.dispatch_transfer(transfer.id, StaffId::new()),
        ] {
            assert!(matches!(
                result,
                Err(InventoryError::TransferAlreadyTerminal { .. })
            ));
        }
    }

    #[test]
    fn test_list_by_status_partitions_transfers() {
        let bank = service();
        let a = register(&bank, BloodGroup::APos, "Main");
        let b = register(&bank, BloodGroup::BPos, "Main");

        let open = bank
            .request_transfer(main_loc(), icu(), vec![a.id], StaffId::new())
            .unwrap();
        let done = bank
            .request_transfer(main_loc(), icu(), vec![b.id], StaffId::new())
            .unwrap();
        bank.complete_transfer(done.id).unwrap();

        let requested = bank.transfers_by_status(TransferStatus::Requested);
        assert_eq!(requested.len(), 1);
        assert_eq!(requested[0].id, open.id);

        let completed = bank.transfers_by_status(TransferStatus::Completed);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, done.id);
    }
}
