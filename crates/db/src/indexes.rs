use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users: email is the global identity key; uid links the external
    // subject after first login; lead backs the team grouping view.
    create_indexes(
        db,
        "users",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index_sparse(bson::doc! { "uid": 1 }),
            index(bson::doc! { "lead": 1 }),
            index(bson::doc! { "role": 1 }),
        ],
    )
    .await?;

    // Publications: the public read path filters on status.
    create_indexes(
        db,
        "publications",
        vec![
            index(bson::doc! { "status": 1, "created_at": -1 }),
            index(bson::doc! { "created_by": 1 }),
        ],
    )
    .await?;

    // Conferences: lead-scoped listing.
    create_indexes(
        db,
        "conferences",
        vec![index(bson::doc! { "lead": 1, "created_at": -1 })],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

fn index_sparse(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().sparse(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
