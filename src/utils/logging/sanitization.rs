/// Mask the local part of an email-like subject before it reaches the logs
///
/// Role names and other non-email subjects are returned unchanged.
pub fn mask_subject(subject: &str) -> String {
    match subject.split_once('@') {
        Some((local, domain)) => {
            let visible: String = local.chars().take(2).collect();
            format!("{}***@{}", visible, domain)
        }
        None => subject.to_string(),
    }
}
