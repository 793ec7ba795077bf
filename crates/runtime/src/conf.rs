/// Configuration of the object model's reflection primitives
#[derive(Debug, Clone)]
pub struct RuntimeConf {
    /// How many proxies can be traversed before giving up
    ///
    /// Reaching it means the value is a pathological chain of proxies, which is
    /// reported as an error (the equivalent of exhausting the call stack).
    pub proxy_depth_limit: usize,
}

impl Default for RuntimeConf {
    fn default() -> Self {
        Self {
            proxy_depth_limit: 1000,
        }
    }
}
