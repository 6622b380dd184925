//! Integration tests for the service layer over the in-memory store.
//!
//! Tests: Service → Store → Service read-back
//!
//! Verifies:
//! - Registered clients read back trimmed and ordered by name
//! - Sales validation rejects input before any row is written
//! - Purchase history joins catalog names and orders by sale date

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, Utc};

    use opticpos_clients::{ClientId, ClientInput, search_clients};
    use opticpos_inventory::{FrameId, InventoryFrame, InventoryLens, LensId};
    use opticpos_sales::{
        GlassesSaleInput, InstallmentPlan, MiscItem, MiscSaleInput, PaymentMethod, ProductItem,
    };

    use crate::services::{
        CatalogReader, ClientRegistry, HistoryAggregator, SalesLedger, ServiceError,
    };
    use crate::store::{InMemoryStore, StoreError};

    struct Shop {
        store: Arc<InMemoryStore>,
        registry: ClientRegistry<Arc<InMemoryStore>>,
        ledger: SalesLedger<Arc<InMemoryStore>>,
        history: HistoryAggregator<Arc<InMemoryStore>>,
        catalog: CatalogReader<Arc<InMemoryStore>>,
    }

    fn setup() -> Shop {
        opticpos_observability::init_for_tests();

        let store = Arc::new(InMemoryStore::new());
        Shop {
            registry: ClientRegistry::new(store.clone()),
            ledger: SalesLedger::new(store.clone()),
            history: HistoryAggregator::new(store.clone()),
            catalog: CatalogReader::new(store.clone()),
            store,
        }
    }

    fn seed_frame(shop: &Shop, name: &str) -> FrameId {
        let frame = InventoryFrame::new(FrameId::generate(), name, Some("RB-01"), Utc::now()).unwrap();
        let id = frame.id_typed();
        shop.store.insert_frame(frame).unwrap();
        id
    }

    fn seed_lens(shop: &Shop, product_code: &str) -> LensId {
        let lens = InventoryLens::new(LensId::generate(), product_code, None, Utc::now()).unwrap();
        let id = lens.id_typed();
        shop.store.insert_lens(lens).unwrap();
        id
    }

    fn glasses_input(
        client_id: ClientId,
        frame_id: FrameId,
        lens_id: LensId,
        sale_date: Option<NaiveDate>,
        amount: &str,
    ) -> GlassesSaleInput {
        GlassesSaleInput {
            client_id: Some(client_id),
            frame_id: Some(frame_id),
            lens_id: Some(lens_id),
            sale_date,
            amount: amount.to_string(),
            payment_method: "Pix".to_string(),
            installment_type: Some("lump-sum".to_string()),
            installment_count: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[tokio::test]
    async fn end_to_end_glasses_sale_shows_in_history() {
        let shop = setup();

        let client = shop
            .registry
            .register_client(ClientInput {
                phone: Some("11 98888-7777".to_string()),
                ..ClientInput::named("Maria Silva")
            })
            .await
            .unwrap();
        let frame_id = seed_frame(&shop, "Aviator Gold");
        let lens_id = seed_lens(&shop, "VS-150");

        let sale = shop
            .ledger
            .record_glasses_sale(glasses_input(
                client.id_typed(),
                frame_id,
                lens_id,
                date(2024, 3, 10),
                "350.00",
            ))
            .await
            .unwrap();
        assert_eq!(sale.installments, InstallmentPlan::LumpSum);
        assert_eq!(sale.installments.installment_count(), 1);

        let history: Vec<_> = shop
            .history
            .get_purchase_history(client.id_typed())
            .await
            .unwrap()
            .collect();

        assert_eq!(history.len(), 1);
        let record = &history[0];
        assert_eq!(record.sale_id, sale.id);
        assert_eq!(record.amount.to_string(), "350.00");
        assert_eq!(record.payment_method, PaymentMethod::Pix);
        assert_eq!(record.frame_name.as_deref(), Some("Aviator Gold"));
        assert_eq!(record.lens_product_code.as_deref(), Some("VS-150"));
    }

    #[tokio::test]
    async fn registered_client_lists_with_trimmed_fields() {
        let shop = setup();

        shop.registry
            .register_client(ClientInput {
                name: "  Joana Prado ".to_string(),
                phone: Some("   ".to_string()),
                address: Some(" Rua das Flores, 12 ".to_string()),
                pupillary_distance: Some("62".to_string()),
                prescription: None,
            })
            .await
            .unwrap();
        shop.registry
            .register_client(ClientInput::named("Ana Costa"))
            .await
            .unwrap();

        let clients = shop.registry.list_clients().await.unwrap();
        let names: Vec<&str> = clients.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Ana Costa", "Joana Prado"]);

        let joana = &clients[1];
        assert_eq!(joana.phone(), None);
        assert_eq!(joana.details().address(), Some("Rua das Flores, 12"));
        assert_eq!(joana.details().pupillary_distance(), Some("62"));

        let found = search_clients(&clients, "joana");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id_typed(), joana.id_typed());
    }

    #[tokio::test]
    async fn blank_name_is_rejected_without_writing() {
        let shop = setup();

        for name in ["", "   \t"] {
            let err = shop
                .registry
                .register_client(ClientInput::named(name))
                .await
                .unwrap_err();
            match err {
                ServiceError::Validation(_) => {}
                _ => panic!("Expected Validation error for blank name"),
            }
        }

        assert!(shop.registry.list_clients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_details_and_keeps_identity() {
        let shop = setup();
        let client = shop
            .registry
            .register_client(ClientInput::named("Carlos"))
            .await
            .unwrap();

        shop.registry
            .update_client(
                client.id_typed(),
                ClientInput {
                    prescription: Some("OD -1.25 OE -1.00".to_string()),
                    ..ClientInput::named("Carlos Mendes")
                },
            )
            .await
            .unwrap();

        let updated = shop.registry.get_client(client.id_typed()).await.unwrap();
        assert_eq!(updated.name(), "Carlos Mendes");
        assert_eq!(updated.details().prescription(), Some("OD -1.25 OE -1.00"));
        assert_eq!(updated.created_at(), client.created_at());
    }

    #[tokio::test]
    async fn failed_update_leaves_record_unchanged() {
        let shop = setup();
        let client = shop
            .registry
            .register_client(ClientInput::named("Beatriz"))
            .await
            .unwrap();

        let err = shop
            .registry
            .update_client(client.id_typed(), ClientInput::named("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = shop
            .registry
            .update_client(ClientId::generate(), ClientInput::named("Ghost"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotFound);

        let stored = shop.registry.get_client(client.id_typed()).await.unwrap();
        assert_eq!(stored, client);
    }

    #[tokio::test]
    async fn history_of_client_without_sales_is_empty() {
        let shop = setup();
        let client = shop
            .registry
            .register_client(ClientInput::named("Pedro"))
            .await
            .unwrap();

        let history = shop.history.get_purchase_history(client.id_typed()).await.unwrap();
        assert_eq!(history.len(), 0);

        let unknown = shop.history.get_purchase_history(ClientId::generate()).await.unwrap();
        assert_eq!(unknown.count(), 0);
    }

    #[tokio::test]
    async fn history_is_newest_first_and_scoped_to_client() {
        let shop = setup();
        let frame_id = seed_frame(&shop, "Round");
        let lens_id = seed_lens(&shop, "AR-200");
        let maria = shop.registry.register_client(ClientInput::named("Maria")).await.unwrap();
        let other = shop.registry.register_client(ClientInput::named("Other")).await.unwrap();

        for (day, amount) in [(5, "100"), (20, "200"), (12, "150")] {
            shop.ledger
                .record_glasses_sale(glasses_input(
                    maria.id_typed(),
                    frame_id,
                    lens_id,
                    date(2024, 1, day),
                    amount,
                ))
                .await
                .unwrap();
        }
        shop.ledger
            .record_glasses_sale(glasses_input(other.id_typed(), frame_id, lens_id, date(2024, 2, 1), "999"))
            .await
            .unwrap();

        let dates: Vec<NaiveDate> = shop
            .history
            .get_purchase_history(maria.id_typed())
            .await
            .unwrap()
            .map(|r| r.sale_date)
            .collect();

        assert_eq!(dates, vec![
            date(2024, 1, 20).unwrap(),
            date(2024, 1, 12).unwrap(),
            date(2024, 1, 5).unwrap(),
        ]);
    }

    #[tokio::test]
    async fn removed_catalog_entries_read_back_as_absent() {
        let shop = setup();
        let frame_id = seed_frame(&shop, "Cat Eye");
        let lens_id = seed_lens(&shop, "PH-1");
        let client = shop.registry.register_client(ClientInput::named("Lia")).await.unwrap();
        let sale = shop
            .ledger
            .record_glasses_sale(glasses_input(client.id_typed(), frame_id, lens_id, None, "80"))
            .await
            .unwrap();
        assert_eq!(sale.sale_date, sale.created_at.date_naive());

        shop.store.remove_lens(lens_id).unwrap();

        let record = shop
            .history
            .get_purchase_history(client.id_typed())
            .await
            .unwrap()
            .next()
            .unwrap();
        assert_eq!(record.frame_name.as_deref(), Some("Cat Eye"));
        assert_eq!(record.lens_product_code, None);
        assert_eq!(record.sale_id, sale.id);
    }

    #[tokio::test]
    async fn negative_amount_fails_and_zero_succeeds() {
        let shop = setup();
        let frame_id = seed_frame(&shop, "Kids");
        let lens_id = seed_lens(&shop, "K-1");
        let client = shop.registry.register_client(ClientInput::named("Rui")).await.unwrap();

        let err = shop
            .ledger
            .record_glasses_sale(glasses_input(client.id_typed(), frame_id, lens_id, None, "-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(shop.store.glasses_sales().unwrap().is_empty());

        let sale = shop
            .ledger
            .record_glasses_sale(glasses_input(client.id_typed(), frame_id, lens_id, None, "0"))
            .await
            .unwrap();
        assert!(sale.amount.as_decimal().is_zero());
    }

    #[tokio::test]
    async fn amounts_outside_the_stored_precision_are_rejected_before_the_store() {
        let shop = setup();
        let frame_id = seed_frame(&shop, "Oval");
        let lens_id = seed_lens(&shop, "OV-3");
        let client = shop.registry.register_client(ClientInput::named("Ivo")).await.unwrap();

        for amount in ["10.999", "123456789012.00"] {
            let err = shop
                .ledger
                .record_glasses_sale(glasses_input(client.id_typed(), frame_id, lens_id, None, amount))
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "amount {amount} should be rejected");
        }
        assert!(shop.store.glasses_sales().unwrap().is_empty());

        let err = shop
            .ledger
            .record_misc_sale(MiscSaleInput {
                kind: "product".to_string(),
                item_detail: "Xerox".to_string(),
                sale_date: None,
                amount: "0.125".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn installments_are_recorded_with_their_count() {
        let shop = setup();
        let frame_id = seed_frame(&shop, "Sport");
        let lens_id = seed_lens(&shop, "SP-9");
        let client = shop.registry.register_client(ClientInput::named("Davi")).await.unwrap();

        let mut input = glasses_input(client.id_typed(), frame_id, lens_id, None, "600");
        input.payment_method = "Crédito".to_string();
        input.installment_type = Some("installments".to_string());
        input.installment_count = Some(3);

        let sale = shop.ledger.record_glasses_sale(input.clone()).await.unwrap();
        assert_eq!(sale.installments, InstallmentPlan::Installments(3));

        for count in [1, 5] {
            input.installment_count = Some(count);
            let err = shop.ledger.record_glasses_sale(input.clone()).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn sale_with_unknown_reference_is_a_store_constraint() {
        let shop = setup();
        let lens_id = seed_lens(&shop, "X-1");
        let client = shop.registry.register_client(ClientInput::named("Nina")).await.unwrap();

        let err = shop
            .ledger
            .record_glasses_sale(glasses_input(client.id_typed(), FrameId::generate(), lens_id, None, "10"))
            .await
            .unwrap_err();
        match err {
            ServiceError::Store(StoreError::Constraint(msg)) => assert!(msg.contains("frame_id")),
            _ => panic!("Expected constraint error for unknown frame"),
        }
    }

    #[tokio::test]
    async fn product_item_cannot_be_sold_as_maintenance() {
        let shop = setup();

        let err = shop
            .ledger
            .record_misc_sale(MiscSaleInput {
                kind: "maintenance".to_string(),
                item_detail: "Xerox".to_string(),
                sale_date: None,
                amount: "1.00".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(shop.ledger.list_misc_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn misc_sales_list_newest_first() {
        let shop = setup();

        for (day, item) in [(1, "Xerox"), (3, "Limpa lentes")] {
            shop.ledger
                .record_misc_sale(MiscSaleInput {
                    kind: "product".to_string(),
                    item_detail: item.to_string(),
                    sale_date: date(2024, 6, day),
                    amount: "5".to_string(),
                })
                .await
                .unwrap();
        }

        let sales = shop.ledger.list_misc_sales().await.unwrap();
        let items: Vec<MiscItem> = sales.iter().map(|s| s.item).collect();
        assert_eq!(items, vec![
            MiscItem::Product(ProductItem::LensCleaner),
            MiscItem::Product(ProductItem::Photocopy),
        ]);
    }

    #[tokio::test]
    async fn catalog_lists_are_sorted() {
        let shop = setup();
        seed_frame(&shop, "Zeta");
        seed_frame(&shop, "Alpha");
        seed_lens(&shop, "B-2");
        seed_lens(&shop, "A-1");

        let frames = shop.catalog.list_frames().await.unwrap();
        let labels: Vec<String> = frames.iter().map(|f| f.display_label()).collect();
        assert_eq!(labels, vec!["Alpha (RB-01)", "Zeta (RB-01)"]);

        let lenses = shop.catalog.list_lenses().await.unwrap();
        let codes: Vec<&str> = lenses.iter().map(|l| l.product_code()).collect();
        assert_eq!(codes, vec!["A-1", "B-2"]);
    }
}
