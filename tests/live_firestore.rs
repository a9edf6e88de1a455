//! Runs against the Firestore project configured through the `FIREBASE_*`
//! environment variables: `cargo test -- --ignored`.

use services_seeder::{
    firestore::collection,
    seeder::{seed, SeedBatch},
    services::{ServiceItem, ServicesList},
};

#[tokio::test]
#[ignore = "needs FIREBASE_* credentials for a real project"]
async fn seeds_services_list_into_firestore() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = services_seeder::firestore::test_helpers::initialise().await?;

    let shop_id = format!("seed-test-{}", ulid::Ulid::new());
    let collection_path = format!("shops/{shop_id}/services_list");
    let body = ServicesList {
        items: vec![
            ServiceItem::new("Haircut", 1),
            ServiceItem::new("Dematting", 2),
        ],
    };
    let documents = SeedBatch::new().with("en", body.clone())?;

    let doc_ref = collection("shops")
        .doc(shop_id)
        .collection("services_list")
        .doc("en");

    // A stale document with an extra field is replaced wholesale by the seed.
    client
        .set_document(
            &doc_ref,
            &serde_json::json!({ "items": [], "legacy": true }),
        )
        .await?;

    let written = seed(&mut client, &collection_path, &documents).await?;
    assert_eq!(written, 1);

    // Seeding again overwrites the same document.
    seed(&mut client, &collection_path, &documents).await?;

    let raw: Option<serde_json::Value> = client.get_document(&doc_ref).await?;
    assert!(raw.is_some_and(|doc| doc.get("legacy").is_none()));
    let stored: Option<ServicesList> = client.get_document(&doc_ref).await?;

    assert_eq!(stored, Some(body));

    Ok(())
}
