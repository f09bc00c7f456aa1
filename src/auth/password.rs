//! 口令哈希
//!
//! 存储格式：`pbkdf2:{iterations}:{hex_salt}:{hex_hash}`（PBKDF2-HMAC-SHA256）。
//! 校验时从存储串里读迭代次数，旧哈希在参数调大后仍可验证。

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

/// PBKDF2 迭代次数
const ITERATIONS: u32 = 100_000;
/// 盐长度（字节）
const SALT_LENGTH: usize = 16;
/// 派生密钥长度（字节）
const HASH_LENGTH: usize = 32;

/// 生成口令哈希
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, ITERATIONS, &mut hash);

    format!(
        "pbkdf2:{}:{}:{}",
        ITERATIONS,
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// 校验口令；存储串格式不合法时视为不匹配
pub fn verify_password(password: &str, stored: &str) -> bool {
    let parts: Vec<&str> = stored.split(':').collect();
    if parts.len() != 4 || parts[0] != "pbkdf2" {
        return false;
    }

    let Ok(iterations) = parts[1].parse::<u32>() else {
        return false;
    };
    let Ok(salt) = hex::decode(parts[2]) else {
        return false;
    };
    let Ok(expected) = hex::decode(parts[3]) else {
        return false;
    };
    if expected.is_empty() {
        return false;
    }

    let mut hash = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut hash);

    hash == expected
}
