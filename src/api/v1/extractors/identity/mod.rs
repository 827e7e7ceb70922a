/*!
 * Caller identity extractor
 *
 * Responsibility:
 * - middleware が extensions に入れた Identity を handler に提供する
 * - 型定義は services::identity (authz middleware と共有)
 *
 * Public API:
 * - IdentityExtractor
 */

mod core;

pub use self::core::IdentityExtractor;
