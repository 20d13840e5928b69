use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use std::sync::{Arc, OnceLock};

use crate::auth::AuthError;

const DUMMY_PASSWORD: &str = "no-such-assignee";

/// Argon2id によるパスワードのハッシュ化と照合
#[derive(Clone, Default)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    /// 存在しない利用者の照合に使うハッシュ（初回に同じコストで生成）
    dummy_hash: Arc<OnceLock<Option<String>>>,
}

impl PasswordService {
    /// コストを指定して作成（テストでは小さな値を使う）
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            dummy_hash: Arc::default(),
        })
    }

    /// PHC 形式のハッシュ文字列を返す
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// ハッシュと一致するか。ハッシュ文字列が壊れている場合もエラーではなく不一致とする
    pub fn verify(&self, password: &str, password_hash: &str) -> bool {
        match PasswordHash::new(password_hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("保存済みパスワードハッシュの解析に失敗: {}", e);
                false
            }
        }
    }

    /// 該当する利用者がいない場合の照合
    ///
    /// 実在する利用者と同じく Argon2 の照合を 1 回行い、常に不一致を返す。
    pub fn verify_unknown_user(&self, password: &str) -> bool {
        let dummy = self
            .dummy_hash
            .get_or_init(|| self.hash(DUMMY_PASSWORD).ok());
        if let Some(hash) = dummy {
            let _ = self.verify(password, hash);
        }
        false
    }
}

impl std::fmt::Debug for PasswordService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordService").finish_non_exhaustive()
    }
}
