/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - pub fn apply(...) をそれぞれのモジュールが持つ
 */
pub mod authz;
pub mod http;
pub mod identity;
