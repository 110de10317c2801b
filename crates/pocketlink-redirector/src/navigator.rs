/// Performs the final hop to the long URL.
pub trait Navigator: Send + Sync {
    fn navigate(&self, long_url: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, long_url: &str) {
        self(long_url)
    }
}
