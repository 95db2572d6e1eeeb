use url::{Host, Url};

/// Public suffixes that span two labels. Hosts ending in one of these keep
/// three labels in their registrable domain (`shop.example.co.uk` →
/// `example.co.uk`); everything else keeps two.
///
/// This is the subset of the public-suffix list that shows up in practice for
/// editorial/review sites; the full list would be overkill for a dedup key.
const MULTI_LABEL_SUFFIXES: &[&str] = &[
    "ac.il", "ac.in", "ac.jp", "ac.nz", "ac.uk", "co.id", "co.il", "co.in",
    "co.jp", "co.kr", "co.nz", "co.th", "co.uk", "co.za", "com.ar", "com.au",
    "com.br", "com.cn", "com.eg", "com.hk", "com.mx", "com.my", "com.ph",
    "com.sa", "com.sg", "com.tr", "com.tw", "com.ua", "com.vn", "edu.au",
    "go.jp", "go.kr", "gov.au", "gov.br", "gov.cn", "gov.in", "gov.uk",
    "govt.nz", "me.uk", "ne.jp", "net.au", "net.br", "net.cn", "net.in",
    "net.nz", "net.uk", "or.id", "or.jp", "or.kr", "or.th", "org.au",
    "org.br", "org.cn", "org.il", "org.in", "org.mx", "org.nz", "org.uk",
    "org.za",
];

/// Extracts the registrable domain (eTLD+1) from a URL
///
/// Two URLs with the same registrable domain are duplicates for the purposes
/// of result assembly, regardless of subdomain or path. `www.` and any other
/// subdomain labels are dropped by the suffix-aware split.
///
/// Best-effort on malformed input: a string with no parseable host is
/// returned unchanged rather than raising, so callers can always use the
/// result as a dedup key. Bare hosts (`example.co.uk`) are accepted directly.
/// IP-address hosts are returned whole.
///
/// # Examples
///
/// ```
/// use review_scout::url::registrable_domain;
///
/// assert_eq!(registrable_domain("https://www.example.com/a"), "example.com");
/// assert_eq!(registrable_domain("https://shop.example.co.uk/"), "example.co.uk");
/// assert_eq!(registrable_domain("not a url"), "not a url");
/// ```
pub fn registrable_domain(input: &str) -> String {
    match Url::parse(input) {
        Ok(url) => match url.host() {
            Some(Host::Domain(host)) => shorten_host(&host.to_lowercase()),
            Some(ip) => ip.to_string(),
            None => input.to_string(),
        },
        // Not an absolute URL; treat host-shaped input as a bare host.
        Err(_) => {
            if input.contains('.') && !input.contains('/') && !input.contains(char::is_whitespace) {
                shorten_host(&input.to_lowercase())
            } else {
                input.to_string()
            }
        }
    }
}

/// Reduces a lowercase host to its registrable domain.
fn shorten_host(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() <= 2 {
        return labels.join(".");
    }

    let last_two = labels[labels.len() - 2..].join(".");
    if MULTI_LABEL_SUFFIXES.contains(&last_two.as_str()) {
        labels[labels.len() - 3..].join(".")
    } else {
        last_two
    }
}
