//! End-to-end flows through builder, factory, data layer and validator

use std::sync::Arc;

use serde_json::json;
use test_case::test_case;

use shopcheck_common::observer::{RecordingObserver, UiEvent, UiEventBus, UiObserver};
use shopcheck_common::{
    create_event_factory, create_product, create_validator, DataLayer, Error, EventName,
    ProductBuilder, ProductPreset, TransactionData, ValidationChain, ValidationPreset,
};

#[test_case(ProductPreset::Smartphone, "PROD-010", 499.90 ; "smartphone")]
#[test_case(ProductPreset::Notebook, "PROD-001", 299.90 ; "notebook")]
#[test_case(ProductPreset::Mouse, "PROD-002", 150.00 ; "mouse")]
#[test_case(ProductPreset::Keyboard, "PROD-003", 350.00 ; "keyboard")]
#[test_case(ProductPreset::Headset, "PROD-004", 280.00 ; "headset")]
#[test_case(ProductPreset::Webcam, "PROD-005", 180.00 ; "webcam")]
fn view_item_for_every_preset(preset: ProductPreset, id: &str, price: f64) {
    let product = ProductBuilder::new().preset(preset).build().unwrap();
    let event = create_event_factory().create_view_item_event(&product);

    let mut data_layer = DataLayer::new();
    data_layer.push(&event).unwrap();

    let entry = data_layer.latest(EventName::ViewItem).unwrap();
    ValidationChain::new()
        .with_preset(ValidationPreset::ViewItem)
        .validate_field_value("ecommerce.items[0].item_id", id)
        .validate_field_value("ecommerce.value", price)
        .validate(entry)
        .unwrap();
}

#[test]
fn cart_then_purchase() {
    let factory = create_event_factory();
    let phone = create_product().as_smartphone().build().unwrap();
    let notebook = create_product().as_notebook().build().unwrap();
    let keyboard = create_product().as_keyboard().build().unwrap();

    let recorder = Arc::new(RecordingObserver::new());
    let bus = UiEventBus::new().add_observer(recorder.clone() as Arc<dyn UiObserver>);
    let mut data_layer = DataLayer::new().with_observers(bus);

    for product in [&phone, &notebook, &keyboard] {
        data_layer
            .push(&factory.create_add_to_cart_event(product))
            .unwrap();
    }

    let basket = vec![phone, notebook, keyboard];
    let checkout = factory.create_begin_checkout_event(&basket).unwrap();
    assert_eq!(checkout.value(), Some(1149.80));
    data_layer.push(&checkout).unwrap();

    let transaction = TransactionData::new("TXN-2025-001", basket)
        .with_affiliation("Loja Online")
        .with_tax(124.97)
        .with_shipping(50.00);
    let purchase = factory.create_purchase_event(&transaction).unwrap();
    let index = data_layer.push(&purchase).unwrap();
    assert_eq!(index, 4);

    let entry = data_layer.latest(EventName::Purchase).unwrap();
    create_validator()
        .validate_purchase_event()
        .validate_items_count(3)
        .validate_field_value("ecommerce.value", 1324.77)
        .validate(entry)
        .unwrap();

    let pushes: Vec<_> = recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            UiEvent::DataLayerPush { index, .. } => Some(index),
            _ => None,
        })
        .collect();
    assert_eq!(pushes, vec![0, 1, 2, 3, 4]);
}

#[test]
fn latest_skips_newer_entries_of_other_kinds() {
    let factory = create_event_factory();
    let mouse = create_product().as_mouse().build().unwrap();
    let webcam = create_product().as_webcam().build().unwrap();

    let mut data_layer = DataLayer::new();
    data_layer.push_value(json!({"gtm.start": 1}));
    data_layer.push(&factory.create_view_item_event(&mouse)).unwrap();
    data_layer.push(&factory.create_view_item_event(&webcam)).unwrap();
    data_layer.push(&factory.create_add_to_cart_event(&mouse)).unwrap();

    let view = data_layer.latest(EventName::ViewItem).unwrap();
    assert_eq!(view["ecommerce"]["items"][0]["item_id"], "PROD-005");
    assert!(data_layer.latest(EventName::Purchase).is_none());
    assert_eq!(data_layer.last().unwrap()["event"], "add_to_cart");
}

#[test]
fn tampered_total_is_caught() {
    let product = create_product()
        .with_id("PROD-777")
        .unwrap()
        .with_name("Cadeira Gamer")
        .unwrap()
        .with_price(899.99)
        .unwrap()
        .with_quantity(2)
        .unwrap()
        .build()
        .unwrap();
    let event = create_event_factory().create_add_to_cart_event(&product);
    let mut value = event.to_value().unwrap();

    let chain = create_validator().with_preset(ValidationPreset::AddToCart);
    chain.validate(&value).unwrap();

    value["ecommerce"]["value"] = json!(1800.00);
    let err = chain.validate(&value).unwrap_err();
    assert!(err.is_assertion(), "{err}");
    assert!(err.to_string().contains("calculated_total"));
}

#[test]
fn failure_kinds_stay_distinct() {
    let product = create_product().as_headset().build().unwrap();
    let value = create_event_factory()
        .create_remove_from_cart_event(&product)
        .to_value()
        .unwrap();

    let missing = create_validator()
        .validate_field_value("ecommerce.items[3].price", 280.00)
        .validate(&value)
        .unwrap_err();
    assert!(missing.is_path_resolution());

    let malformed = create_validator()
        .validate_field_value("ecommerce..items", 1)
        .validate(&value)
        .unwrap_err();
    assert!(matches!(malformed, Error::InvalidPath { .. }));

    let mismatch = create_validator()
        .validate_event_name(EventName::AddToCart)
        .validate(&value)
        .unwrap_err();
    assert!(mismatch.is_assertion());
}

#[test]
fn purchase_rejects_bad_input() {
    let factory = create_event_factory();
    let product = create_product().as_mouse().build().unwrap();

    let blank = TransactionData::new("  ", vec![product.clone()]);
    assert!(matches!(
        factory.create_purchase_event(&blank),
        Err(Error::FactoryInput(_))
    ));

    let empty = TransactionData::new("TXN-1", vec![]);
    assert!(factory.create_purchase_event(&empty).is_err());

    let negative = TransactionData::new("TXN-1", vec![product]).with_tax(-1.0);
    assert!(factory.create_purchase_event(&negative).is_err());
}
