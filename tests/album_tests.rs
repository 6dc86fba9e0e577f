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
    use fimage::{AlbumProps, FImageError};
    use serde_json::{Value, json};
    use wiremock::matchers::{any, body_json, method, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    // Answers with the posted album, as the API does
    struct EchoAlbum;

    impl Respond for EchoAlbum {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: Value = request.body_json().unwrap();
            ResponseTemplate::new(201).set_body_json(json!({
                "id": 42,
                "name": body["name"],
                "description": body.get("description").cloned().unwrap_or(json!("")),
                "file_count": 0,
                "created_at": "2024-06-01T10:00:00Z"
            }))
        }
    }

    #[tokio::test]
    async fn create_round_trips_name_and_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/albums"))
            .and(body_json(json!({
                "name": "Vacation Photos 2024",
                "description": "Photos from our summer vacation"
            })))
            .respond_with(EchoAlbum)
            .expect(1)
            .mount(&server)
            .await;

        let client = helpers::mock_client(&server);
        let album = client
            .albums()
            .create(
                AlbumProps::new("Vacation Photos 2024")
                    .with_description("Photos from our summer vacation"),
            )
            .await
            .unwrap();

        assert_eq!(album.id, 42);
        assert_eq!(album.name, "Vacation Photos 2024");
        assert_eq!(album.description, "Photos from our summer vacation");
    }

    #[tokio::test]
    async fn missing_name_never_reaches_the_server() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = helpers::mock_client(&server);
        let err = client.albums().create(AlbumProps::new("")).await.unwrap_err();
        assert!(matches!(err, FImageError::InvalidArgument(_)));
        let err = client.albums().update(3, AlbumProps::default()).await.unwrap_err();
        assert!(matches!(err, FImageError::InvalidArgument(_)));
        let err = client.albums().get(0).await.unwrap_err();
        assert!(matches!(err, FImageError::InvalidArgument(_)));

        assert!(helpers::received(&server).await.is_empty());
    }

    #[tokio::test]
    async fn list_get_update_delete() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/albums"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "albums": [
                    {"id": 1, "name": "Trips", "description": "", "file_count": 4, "created_at": "2024-01-01"},
                    {"id": 2, "name": "Pets", "description": "cats", "file_count": 9, "created_at": "2024-02-01"}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/albums/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"id": 2, "name": "Pets", "description": "cats", "file_count": 9}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/albums/2"))
            .and(body_json(json!({"name": "Animals"})))
            .respond_with(EchoAlbum)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/albums/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Album deleted"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = helpers::mock_client(&server);
        let albums = client.albums().list().await.unwrap();
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[1].file_count, 9);

        assert_eq!(client.albums().get(2).await.unwrap().description, "cats");

        let renamed = client.albums().update(2, AlbumProps::new("Animals")).await.unwrap();
        assert_eq!(renamed.name, "Animals");

        let resp = client.albums().delete(2).await.unwrap();
        assert_eq!(resp.message, "Album deleted");
    }

    #[tokio::test]
    async fn unknown_album_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/albums/404"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "album not found"})))
            .mount(&server)
            .await;

        let client = helpers::mock_client(&server);
        let err = client.albums().get(404).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "f-image API error (status 404): album not found");
    }
}
