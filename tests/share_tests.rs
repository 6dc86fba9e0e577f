/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
mod helpers;

#[cfg(test)]
mod test {
    use crate::helpers;
    use fimage::{CreateShareOptions, FImageError, PageOptions, SharedContentType, UpdateShareOptions};
    use serde_json::json;
    use wiremock::matchers::{any, body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn share_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "token": "abc123",
            "share_url": "https://f-image.com/s/abc123",
            "file_id": 10,
            "has_password": true,
            "expires_at": "2024-07-02T12:00:00Z",
            "max_views": 100,
            "view_count": 3,
            "is_active": true,
            "created_at": "2024-07-01T12:00:00Z"
        })
    }

    #[tokio::test]
    async fn create_without_target_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let client = helpers::mock_client(&server);
        let err = client
            .share()
            .create(CreateShareOptions::default().with_password("pw"))
            .await
            .unwrap_err();

        assert!(matches!(err, FImageError::InvalidArgument(_)));
        assert!(!err.is_api_error());
        assert!(helpers::received(&server).await.is_empty());
    }

    #[tokio::test]
    async fn create_file_share() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/shares"))
            .and(body_json(json!({
                "file_id": 10,
                "password": "secret123",
                "expires_in": 24,
                "max_views": 100
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(share_json(1)))
            .expect(1)
            .mount(&server)
            .await;

        let client = helpers::mock_client(&server);
        let share = client
            .share()
            .create(
                CreateShareOptions::file(10)
                    .with_password("secret123")
                    .with_expiration(24)
                    .with_max_views(100),
            )
            .await
            .unwrap();

        assert_eq!(share.token, "abc123");
        assert_eq!(share.file_id, Some(10));
        assert_eq!(share.album_id, None);
        assert!(share.has_password);
        assert_eq!(share.max_views, Some(100));
        assert_eq!(share.expires_at.unwrap().to_rfc3339(), "2024-07-02T12:00:00+00:00");
    }

    #[tokio::test]
    async fn list_update_delete() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/shares"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "shares": [share_json(1), share_json(2)],
                "total": 2,
                "page": 1,
                "limit": 10
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/shares/2"))
            .and(body_json(json!({"password": "", "is_active": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(share_json(2)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/shares/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Share link deleted"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = helpers::mock_client(&server);
        let shares = client.share().list(PageOptions::new(1, 10)).await.unwrap();
        assert_eq!(shares.shares.len(), 2);

        let share = client
            .share()
            .update(2, UpdateShareOptions::default().clear_password().with_active(false))
            .await
            .unwrap();
        assert_eq!(share.id, 2);

        let err = client
            .share()
            .update(2, UpdateShareOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FImageError::InvalidArgument(_)));

        assert_eq!(client.share().delete(2).await.unwrap().message, "Share link deleted");
    }

    #[tokio::test]
    async fn access_and_verify_password() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/s/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"type": "file", "requires_password": true}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/s/abc123/verify"))
            .and(body_json(json!({"password": "secret123"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "file",
                "file": {"id": 10, "original_name": "sunset.jpg", "url": "https://f-image.com/i/sunset.jpg"},
                "requires_password": false
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/s/abc123/verify"))
            .and(body_json(json!({"password": "wrong"})))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid password"})))
            .mount(&server)
            .await;

        let client = helpers::mock_client(&server);
        let content = client.share().access("abc123").await.unwrap();
        assert!(content.requires_password);
        assert_eq!(content.content_type, SharedContentType::File);
        assert!(content.file.is_none());

        let content = client.share().verify_password("abc123", "secret123").await.unwrap();
        assert_eq!(content.file.unwrap().original_name, "sunset.jpg");

        let err = client.share().verify_password("abc123", "wrong").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.api_error().unwrap().message, "invalid password");

        let err = client.share().verify_password("abc123", "").await.unwrap_err();
        assert!(matches!(err, FImageError::InvalidArgument(_)));
        let err = client.share().access("").await.unwrap_err();
        assert!(matches!(err, FImageError::InvalidArgument(_)));
    }
}
