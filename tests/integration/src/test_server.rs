//! Tests against a running `urlguard-server`.

#[cfg(test)]
mod tests {
    use crate::{endpoint_url, http_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_follow_backdoor_redirect_to_greeting() {
        let client = http_client();
        let base = endpoint_url();

        let resp = client
            .get(format!("{base}/backdoor"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FOUND);
        let location = resp
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("redirect should carry a location")
            .to_owned();
        assert!(location.starts_with("/?sig="));
        assert!(location.contains("&exp="));

        let resp = client
            .get(format!("{base}{location}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(resp.text().await.unwrap(), "Hello World!");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_forbid_greeting_without_signature() {
        let resp = http_client()
            .get(format!("{}/", endpoint_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
        assert_eq!(resp.text().await.unwrap(), "missing signature");
    }
}
