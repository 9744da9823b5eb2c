pub trait DigestNotifier {
    fn deliver(&self, subject: &str, html_body: &str) -> Result<(), String>;
}
