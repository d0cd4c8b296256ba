#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordHasher;
use catalog_service::config::AdminConfig;
use catalog_service::config::SeedConfig;
use catalog_service::config::UploadsConfig;
use catalog_service::domain::category::errors::CategoryError;
use catalog_service::domain::category::models::Category;
use catalog_service::domain::category::models::CategoryId;
use catalog_service::domain::category::models::CategoryName;
use catalog_service::domain::category::ports::CategoryRepository;
use catalog_service::domain::category::service::CategoryService;
use catalog_service::domain::product::errors::ProductError;
use catalog_service::domain::product::models::Product;
use catalog_service::domain::product::models::ProductFilter;
use catalog_service::domain::product::models::ProductId;
use catalog_service::domain::product::models::ProductImage;
use catalog_service::domain::product::ports::ProductRepository;
use catalog_service::domain::product::service::ProductService;
use catalog_service::domain::user::models::User;
use catalog_service::domain::user::models::UserId;
use catalog_service::domain::user::models::Username;
use catalog_service::domain::user::ports::UserRepository;
use catalog_service::domain::user::service::UserService;
use catalog_service::inbound::http::router::create_router;
use catalog_service::inbound::http::router::AppState;
use catalog_service::outbound::storage::FilesystemImageStore;
use catalog_service::seed::initial_seed;
use catalog_service::user::errors::UserError;
use serde_json::json;
use tempfile::TempDir;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryStore>,
    pub uploads: TempDir,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let uploads = tempfile::tempdir().expect("Failed to create upload directory");
        let uploads_config = UploadsConfig {
            directory: uploads.path().to_path_buf(),
            max_request_bytes: 10 * 1024 * 1024,
        };

        let store = Arc::new(InMemoryStore::default());
        let password_hasher = PasswordHasher::with_cost(4).expect("Invalid bcrypt cost");

        let user_service = Arc::new(UserService::new(Arc::clone(&store), password_hasher));
        let category_service = Arc::new(CategoryService::new(Arc::clone(&store)));
        let product_service = Arc::new(ProductService::new(
            Arc::clone(&store),
            Arc::new(FilesystemImageStore::new(uploads.path())),
        ));

        initial_seed(
            user_service.as_ref(),
            category_service.as_ref(),
            &AdminConfig {
                username: ADMIN_USERNAME.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            },
            &SeedConfig {
                categories: "Seeded".to_string(),
            },
        )
        .await
        .expect("Failed to seed");

        let state = AppState {
            user_service,
            category_service,
            product_service,
            authenticator: Arc::new(Authenticator::with_hasher(password_hasher, JWT_SECRET)),
            jwt_expiration_hours: 24,
        };

        let router = create_router(state, &uploads_config);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            store,
            uploads,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.put(self.url(path)).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path)).bearer_auth(token)
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the session token from the response body.
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        let response = self.login(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.token_for(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    pub async fn user_token(&self, username: &str) -> String {
        self.register(username, "pass_word!").await;
        self.token_for(username, "pass_word!").await
    }

    /// Create a category as admin and return its id.
    pub async fn create_category(&self, token: &str, name: &str) -> String {
        let response = self
            .post_authenticated("/api/categories", token)
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_str().expect("Missing id").to_string()
    }
}

pub fn image_part(file_name: &str, bytes: &[u8]) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(file_name.to_string())
}

/// Repository adapters backed by plain vectors.
///
/// Mirrors the relational constraints the Postgres schema enforces:
/// unique usernames and category names, product category foreign key
/// with `ON DELETE SET NULL`.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Tables {
    fn category_exists(&self, id: Option<CategoryId>) -> bool {
        id.map_or(true, |id| self.categories.iter().any(|c| c.id == id))
    }

    fn resolve(&self, product: &Product) -> Product {
        let mut product = product.clone();
        product.category_name = product.category_id.and_then(|id| {
            self.categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.as_str().to_string())
        });
        product
    }
}

impl InMemoryStore {
    pub fn insert_user(&self, user: User) {
        self.tables.lock().unwrap().users.push(user);
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(user.username.to_string()));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.username == *username).cloned())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Category>, CategoryError> {
        let mut categories = self.tables.lock().unwrap().categories.clone();
        categories.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(categories)
    }

    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, CategoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.categories.iter().find(|c| c.id == *id).cloned())
    }

    async fn find_by_name(&self, name: &CategoryName) -> Result<Option<Category>, CategoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.categories.iter().find(|c| c.name == *name).cloned())
    }

    async fn create(&self, category: Category) -> Result<Category, CategoryError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.categories.iter().any(|c| c.name == category.name) {
            return Err(CategoryError::AlreadyExists(category.name.to_string()));
        }
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, CategoryError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .categories
            .iter()
            .any(|c| c.name == category.name && c.id != category.id)
        {
            return Err(CategoryError::AlreadyExists(category.name.to_string()));
        }
        let existing = tables
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or(CategoryError::NotFound(category.id.to_string()))?;
        *existing = category.clone();
        Ok(category)
    }

    async fn delete(&self, id: &CategoryId) -> Result<(), CategoryError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != *id);
        if tables.categories.len() == before {
            return Err(CategoryError::NotFound(id.to_string()));
        }
        for product in tables.products.iter_mut() {
            if product.category_id == Some(*id) {
                product.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ProductError> {
        let tables = self.tables.lock().unwrap();
        let mut products: Vec<Product> = tables
            .products
            .iter()
            .rev()
            .map(|p| tables.resolve(p))
            .filter(|p| filter.matches(p))
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .products
            .iter()
            .find(|p| p.id == *id)
            .map(|p| tables.resolve(p)))
    }

    async fn create(&self, product: Product) -> Result<Product, ProductError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.category_exists(product.category_id) {
            return Err(ProductError::CategoryNotFound(format!(
                "{:?}",
                product.category_id
            )));
        }
        tables.products.push(product.clone());
        Ok(tables.resolve(&product))
    }

    async fn update(
        &self,
        product: Product,
        new_images: Vec<ProductImage>,
    ) -> Result<Product, ProductError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.category_exists(product.category_id) {
            return Err(ProductError::CategoryNotFound(format!(
                "{:?}",
                product.category_id
            )));
        }
        let existing = tables
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(ProductError::NotFound(product.id.to_string()))?;
        let mut images = existing.images.clone();
        images.extend(new_images);
        *existing = Product { images, ..product };
        let updated = existing.clone();
        Ok(tables.resolve(&updated))
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ProductError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.products.len();
        tables.products.retain(|p| p.id != *id);
        if tables.products.len() == before {
            return Err(ProductError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
