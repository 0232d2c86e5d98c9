/// User-facing strings returned in `{error}` / `message` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub invalid_credentials: String,
    pub user_exists: String,
    pub unauthenticated: String,
    pub method_not_allowed: String,
    pub validation_prefix: String,
    pub internal_prefix: String,
    pub progress_saved: String,
    pub timeout: String,
}

impl Messages {
    pub fn russian() -> Self {
        Self {
            invalid_credentials: "Неверные учетные данные".into(),
            user_exists: "Пользователь уже существует".into(),
            unauthenticated: "Необходима авторизация".into(),
            method_not_allowed: "Метод не поддерживается".into(),
            validation_prefix: "Ошибка валидации".into(),
            internal_prefix: "Внутренняя ошибка сервера".into(),
            progress_saved: "Прогресс сохранен".into(),
            timeout: "Превышено время ожидания запроса".into(),
        }
    }

    pub fn english() -> Self {
        Self {
            invalid_credentials: "Invalid credentials".into(),
            user_exists: "User already exists".into(),
            unauthenticated: "Authentication required".into(),
            method_not_allowed: "Method not allowed".into(),
            validation_prefix: "Validation error".into(),
            internal_prefix: "Internal server error".into(),
            progress_saved: "Progress saved".into(),
            timeout: "Request timed out".into(),
        }
    }
}
