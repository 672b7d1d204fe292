/// 生产者集合（只读，一次取回全部）
pub const PATH_PRODUCERS: &str = "producers/";

pub fn url_producers(base: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), PATH_PRODUCERS)
}
