use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(MemeError::asset("x").to_string().contains("asset error:"));
    assert!(MemeError::decode("x").to_string().contains("decode error:"));
    assert!(MemeError::encode("x").to_string().contains("encode error:"));
    assert!(
        MemeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(MemeError::worker("x").to_string().contains("worker error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MemeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
