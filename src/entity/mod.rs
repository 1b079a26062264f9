pub mod admins;
pub mod categories;
pub mod images;
pub mod orders;
pub mod products;
pub mod settings;

pub use admins::Entity as Admins;
pub use categories::Entity as Categories;
pub use images::Entity as Images;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use settings::Entity as Settings;
