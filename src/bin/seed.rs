use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set};
use vitalityboost::{
    config::AppConfig,
    db::{OrmConn, bootstrap, create_orm_conn, run_migrations},
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        products::{ActiveModel as ProductActive, Column as ProductCol, Entity as Products},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;
    bootstrap(&orm, &config).await?;

    let vitamins = ensure_category(&orm, "Vitamins", 10).await?;
    let minerals = ensure_category(&orm, "Minerals", 20).await?;
    let energy = ensure_category(&orm, "Energy", 30).await?;

    let products = vec![
        ("Vitamin D3 2000 IU", "Daily sunshine in a capsule", 14900, 120, vitamins),
        ("Vitamin C 500 mg", "Buffered, gentle on the stomach", 12900, 80, vitamins),
        ("Magnesium Citrate", "For muscles and sleep", 19900, 60, minerals),
        ("Zinc 25 mg", "Supports the immune system", 9900, 0, minerals),
        ("Green Tea Extract", "Caffeine and antioxidants", 24900, 40, energy),
    ];

    for (title, short_desc, price, stock, category_id) in products {
        ensure_product(&orm, title, short_desc, price, stock, category_id).await?;
    }

    println!("Seed completed");
    Ok(())
}

async fn ensure_category(orm: &OrmConn, name: &str, sort_order: i32) -> anyhow::Result<i32> {
    if let Some(existing) = Categories::find()
        .filter(CategoryCol::Name.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let category = CategoryActive {
        id: NotSet,
        name: Set(name.to_string()),
        sort_order: Set(sort_order),
        active: Set(true),
    }
    .insert(orm)
    .await?;

    println!("Created category {name}");
    Ok(category.id)
}

async fn ensure_product(
    orm: &OrmConn,
    title: &str,
    short_desc: &str,
    price: i64,
    stock: i32,
    category_id: i32,
) -> anyhow::Result<()> {
    let exists = Products::find()
        .filter(ProductCol::Title.eq(title))
        .one(orm)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    let now = Utc::now();
    ProductActive {
        id: NotSet,
        title: Set(title.to_string()),
        price: Set(price),
        active: Set(true),
        stock: Set(stock),
        category_id: Set(Some(category_id)),
        image_id: Set(None),
        short_desc: Set(short_desc.to_string()),
        long_desc: Set(String::new()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(orm)
    .await?;

    println!("Created product {title}");
    Ok(())
}
