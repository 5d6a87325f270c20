//! Records, expansion and listing against the in-memory object store.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use schism_protocol::layout::signed_cert_key;
use schism_protocol::{
    fetch_certificate, list_ca_pubkeys, load_object, save_object, BlobStore, Bytes, CaPublicKey,
    CertType, LookupKey, ObjectStoreBlobStore, ProtocolError, SignedCertificate, StoredObject,
};

const BUCKET: &str = "schism-test";
const PREFIX: &str = "schism-test/";

fn cert(cert_type: CertType, identity: &str, principals: &[&str]) -> SignedCertificate {
    let opposite = CaPublicKey {
        certificate_type: cert_type.opposite_ca().unwrap_or(CertType::Unknown),
        authorized_key: Vec::new(),
        key_fingerprint: None,
        host_cert_auth_domain: None,
    };
    SignedCertificate {
        certificate_type: cert_type,
        issued_on: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        identity: identity.to_string(),
        principals: principals.iter().map(|p| p.to_string()).collect(),
        validity_interval: Duration::from_secs(8 * 3600),
        raw_signed_certificate: format!("cert for {}", identity).into_bytes(),
        opposite_public_ca: opposite.object_key(PREFIX),
        signed_certificate_encryption: None,
    }
}

// ============================================================================
// Save / Load
// ============================================================================

#[tokio::test]
async fn test_save_then_load_certificate() {
    let store = ObjectStoreBlobStore::memory(BUCKET);
    let original = cert(CertType::Host, "test.example.com", &["test.example.com"]);

    let key = save_object(&store, BUCKET, PREFIX, &original).await.unwrap();
    assert_eq!(
        key,
        "schism-test/Signed-Certs/host:55e8182ec4413d51676d1ba7480708a48c5b50f4a86b3afb9be6c43c648b373d.json"
    );

    let loaded: SignedCertificate = load_object(&store, BUCKET, &key).await.unwrap();
    assert_eq!(loaded, original);
    assert_eq!(loaded.opposite_public_ca, "schism-test/CA-Pubkeys/user.json");
}

#[tokio::test]
async fn test_load_missing_object() {
    let store = ObjectStoreBlobStore::memory(BUCKET);

    let err = load_object::<CaPublicKey>(&store, BUCKET, "schism-test/CA-Pubkeys/host.json")
        .await
        .unwrap_err();

    assert!(matches!(err, ProtocolError::NotFound { .. }));
}

#[tokio::test]
async fn test_load_corrupt_object() {
    let store = ObjectStoreBlobStore::memory(BUCKET);
    store
        .put(BUCKET, "schism-test/CA-Pubkeys/host.json", Bytes::from("not json"))
        .await
        .unwrap();

    let err = load_object::<CaPublicKey>(&store, BUCKET, "schism-test/CA-Pubkeys/host.json")
        .await
        .unwrap_err();

    match err {
        ProtocolError::DecodeFailure { key, .. } => {
            assert_eq!(key, "schism-test/CA-Pubkeys/host.json")
        }
        other => panic!("expected DecodeFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_object_is_decode_failure() {
    let store = ObjectStoreBlobStore::memory(BUCKET);
    store
        .put(BUCKET, "empty-objects/x.json", Bytes::new())
        .await
        .unwrap();

    let err = load_object::<SignedCertificate>(&store, BUCKET, "empty-objects/x.json")
        .await
        .unwrap_err();

    assert!(matches!(err, ProtocolError::DecodeFailure { .. }));
}

// ============================================================================
// Expansion
// ============================================================================

#[tokio::test]
async fn test_fetch_certificate_by_partial_key() {
    let store = ObjectStoreBlobStore::memory(BUCKET);
    let host = cert(CertType::Host, "test.example.com", &["test.example.com"]);
    let user = cert(CertType::User, "someUser@dev1.example.com", &["someUser", "admin"]);
    save_object(&store, BUCKET, PREFIX, &host).await.unwrap();
    save_object(&store, BUCKET, PREFIX, &user).await.unwrap();

    let partial = LookupKey::parse("h:55e8").unwrap();
    let (full, loaded) = fetch_certificate(&store, BUCKET, PREFIX, &partial)
        .await
        .unwrap();

    assert_eq!(full, host.lookup_key());
    assert_eq!(loaded, host);
}

#[tokio::test]
async fn test_expansion_stays_in_type_namespace() {
    let store = ObjectStoreBlobStore::memory(BUCKET);
    let user = cert(CertType::User, "someUser@dev1.example.com", &["someUser", "admin"]);
    save_object(&store, BUCKET, PREFIX, &user).await.unwrap();

    // The user certificate id starts with "a5ba", but a host lookup must not see it
    let partial = LookupKey::parse("host:a5ba").unwrap();
    let err = partial.expand(&store, BUCKET, PREFIX).await.unwrap_err();
    assert!(matches!(err, ProtocolError::NoMatch { .. }));

    let partial = LookupKey::parse("user:a5ba").unwrap();
    let full = partial.expand(&store, BUCKET, PREFIX).await.unwrap();
    assert_eq!(full, user.lookup_key());
}

#[tokio::test]
async fn test_shared_prefix_is_ambiguous() {
    let store = ObjectStoreBlobStore::memory(BUCKET);
    for id in ["abc1", "abc2"] {
        let key = LookupKey::new(CertType::Host, format!("{:0<64}", id));
        store
            .put(BUCKET, &signed_cert_key(PREFIX, &key), Bytes::from("{}"))
            .await
            .unwrap();
    }

    let err = LookupKey::parse("h:abc")
        .unwrap()
        .expand(&store, BUCKET, PREFIX)
        .await
        .unwrap_err();
    assert!(matches!(err, ProtocolError::AmbiguousKey { .. }));

    let full = LookupKey::parse("h:abc2")
        .unwrap()
        .expand(&store, BUCKET, PREFIX)
        .await
        .unwrap();
    assert_eq!(full.id(), format!("{:0<64}", "abc2"));
}

#[tokio::test]
async fn test_nested_object_is_malformed_stored_key() {
    let store = ObjectStoreBlobStore::memory(BUCKET);
    store
        .put(BUCKET, "schism-test/Signed-Certs/host:abc/extra.json", Bytes::from("{}"))
        .await
        .unwrap();

    let err = LookupKey::parse("host:abc")
        .unwrap()
        .expand(&store, BUCKET, PREFIX)
        .await
        .unwrap_err();
    assert!(matches!(err, ProtocolError::MalformedStoredKey { .. }));
}

#[tokio::test]
async fn test_expand_with_empty_prefix_segment() {
    let store = ObjectStoreBlobStore::memory(BUCKET);
    let host = cert(CertType::Host, "test.example.com", &["test.example.com"]);
    let key = save_object(&store, BUCKET, "p//", &host).await.unwrap();
    assert!(store.get(BUCKET, &key).await.is_ok());

    let partial = LookupKey::parse("h:55e8").unwrap();
    let (full, loaded) = fetch_certificate(&store, BUCKET, "p//", &partial)
        .await
        .unwrap();

    assert_eq!(full, host.lookup_key());
    assert_eq!(loaded, host);
}

#[tokio::test]
async fn test_expand_unknown_bucket() {
    let store = ObjectStoreBlobStore::memory(BUCKET);

    let err = LookupKey::parse("host:abc")
        .unwrap()
        .expand(&store, "other-bucket", PREFIX)
        .await
        .unwrap_err();
    assert!(matches!(err, ProtocolError::StoreUnavailable(_)));
}

// ============================================================================
// CA public keys
// ============================================================================

#[tokio::test]
async fn test_list_ca_pubkeys() {
    let store = ObjectStoreBlobStore::memory(BUCKET);
    let host_ca = CaPublicKey {
        certificate_type: CertType::Host,
        authorized_key: b"ssh-ed25519 AAAAhost".to_vec(),
        key_fingerprint: Some("SHA256:abc".into()),
        host_cert_auth_domain: Some("example.com".into()),
    };
    let user_ca = CaPublicKey {
        certificate_type: CertType::User,
        authorized_key: b"ssh-ed25519 AAAAuser".to_vec(),
        key_fingerprint: None,
        host_cert_auth_domain: None,
    };
    save_object(&store, BUCKET, PREFIX, &host_ca).await.unwrap();
    save_object(&store, BUCKET, PREFIX, &user_ca).await.unwrap();
    save_object(
        &store,
        BUCKET,
        PREFIX,
        &cert(CertType::Host, "test.example.com", &["test.example.com"]),
    )
    .await
    .unwrap();

    let keys = list_ca_pubkeys(&store, BUCKET, PREFIX).await.unwrap();
    assert_eq!(
        keys,
        vec![
            "schism-test/CA-Pubkeys/host-example.com-abc.json".to_string(),
            "schism-test/CA-Pubkeys/user.json".to_string(),
        ]
    );

    let loaded: CaPublicKey = load_object(&store, BUCKET, &keys[0]).await.unwrap();
    assert_eq!(loaded, host_ca);
}
