//! MurmurHash2 实现
//!
//! 通用直方图按词法形式的哈希值分桶，哈希值跨进程、跨平台稳定

const M: u32 = 0x5bd1e995;
const R: u8 = 24;

/// 通用直方图使用的固定种子
pub const HISTOGRAM_SEED: u32 = 0x9747_b28c;

/// 计算字节序列的 MurmurHash2
pub fn murmurhash2(data: &[u8], seed: u32) -> u32 {
    let mut h: u32 = seed ^ (data.len() as u32);
    let mut chunks = data.chunks_exact(4);

    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h = h.wrapping_mul(M) ^ k;
    }

    let tail = chunks.remainder();
    if tail.len() >= 3 {
        h ^= (tail[2] as u32) << 16;
    }
    if tail.len() >= 2 {
        h ^= (tail[1] as u32) << 8;
    }
    if !tail.is_empty() {
        h ^= tail[0] as u32;
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^ (h >> 15)
}

/// 计算节点词法形式的哈希值
pub fn hash_lexical(lexical: &str) -> u32 {
    murmurhash2(lexical.as_bytes(), HISTOGRAM_SEED)
}
