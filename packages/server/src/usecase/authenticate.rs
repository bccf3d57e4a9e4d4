//! UseCase: HTTP API の Bearer トークン認証

use std::sync::Arc;

use crate::domain::{AuthError, Identity, TokenValidator};

/// Bearer 認証のユースケース
pub struct AuthenticateUseCase {
    validator: Arc<dyn TokenValidator>,
}

impl AuthenticateUseCase {
    /// 新しい AuthenticateUseCase を作成
    pub fn new(validator: Arc<dyn TokenValidator>) -> Self {
        Self { validator }
    }

    /// `Authorization` ヘッダーの値を検証する
    ///
    /// # Returns
    ///
    /// * `Err(AuthError::MissingToken)` - ヘッダーがない、または `Bearer ` で始まらない
    /// * `Err(AuthError::InvalidToken)` - トークンが拒否された
    pub async fn execute(&self, authorization: Option<&str>) -> Result<Identity, AuthError> {
        let token = authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.validator.validate(token).await
    }

    /// トークンを検証したうえで、モデレーター権限を要求する
    ///
    /// # Returns
    ///
    /// * `Err(AuthError::NotModerator)` - 有効なトークンだがモデレーターではない
    pub async fn execute_moderator(
        &self,
        authorization: Option<&str>,
    ) -> Result<Identity, AuthError> {
        let identity = self.execute(authorization).await?;
        if !identity.is_moderator() {
            return Err(AuthError::NotModerator);
        }
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Role, UserId},
        infrastructure::auth::StaticTokenValidator,
    };

    fn create_usecase() -> AuthenticateUseCase {
        let validator = StaticTokenValidator::new()
            .with_token(
                "secret",
                Identity {
                    user_id: UserId::new("alice".to_string()).unwrap(),
                    email: None,
                    role: Role::Member,
                },
            )
            .with_token(
                "mod-secret",
                Identity {
                    user_id: UserId::new("carol".to_string()).unwrap(),
                    email: None,
                    role: Role::Moderator,
                },
            );
        AuthenticateUseCase::new(Arc::new(validator))
    }

    #[tokio::test]
    async fn test_valid_bearer_token() {
        // テスト項目: 正しい Bearer トークンで Identity が返る
        // given (前提条件):
        let usecase = create_usecase();

        // when (操作):
        let identity = usecase.execute(Some("Bearer secret")).await.unwrap();

        // then (期待する結果):
        assert_eq!(identity.user_id.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header() {
        // テスト項目: ヘッダーがない・形式が違う場合は MissingToken
        // given (前提条件):
        let usecase = create_usecase();

        // when (操作):
        let missing = usecase.execute(None).await;
        let basic = usecase.execute(Some("Basic c2VjcmV0")).await;
        let empty = usecase.execute(Some("Bearer ")).await;

        // then (期待する結果):
        assert_eq!(missing, Err(AuthError::MissingToken));
        assert_eq!(basic, Err(AuthError::MissingToken));
        assert_eq!(empty, Err(AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_rejected_token() {
        // テスト項目: 未知のトークンは InvalidToken
        // given (前提条件):
        let usecase = create_usecase();

        // when (操作):
        let result = usecase.execute(Some("Bearer nope")).await;

        // then (期待する結果):
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_moderator_required() {
        // テスト項目: モデレーター専用の認証では、一般ユーザーは NotModerator、不正なトークンは従来どおり
        // given (前提条件):
        let usecase = create_usecase();

        // when (操作):
        let moderator = usecase.execute_moderator(Some("Bearer mod-secret")).await;
        let member = usecase.execute_moderator(Some("Bearer secret")).await;
        let rejected = usecase.execute_moderator(Some("Bearer nope")).await;

        // then (期待する結果):
        assert_eq!(moderator.unwrap().user_id.as_str(), "carol");
        assert_eq!(member, Err(AuthError::NotModerator));
        assert_eq!(rejected, Err(AuthError::InvalidToken));
    }
}
