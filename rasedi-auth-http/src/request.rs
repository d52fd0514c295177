use crate::{
  config::ApiConfig,
  error::{HttpAuthError, HttpAuthResult},
  SIGNATURE_HEADER, SIGNATURE_KEY_ID_HEADER,
};
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, Request, Uri};
use rasedi_auth::prelude::{PublicKey, RequestSigner, SigningInput};
use serde::Serialize;

/// A type alias for the key id
type KeyId = String;

/* --------------------------------------- */
/// A trait about the request signature carried in `x-signature` and `x-id`
pub trait RequestSignature {
  type Error;

  /// Check if the request has both signature headers
  fn has_request_signature(&self) -> bool;

  /// Sign `<method> || <key id> || <path and query>` and set the signature headers
  fn set_request_signature(&mut self, signer: &RequestSigner) -> Result<(), Self::Error>;

  /// Verify the signature headers with the given public key, returning the key id they name
  fn verify_request_signature(&self, public_key: &PublicKey) -> Result<KeyId, Self::Error>;
}

impl<B> RequestSignature for Request<B> {
  type Error = HttpAuthError;

  fn has_request_signature(&self) -> bool {
    let headers = self.headers();
    headers.contains_key(SIGNATURE_HEADER) && headers.contains_key(SIGNATURE_KEY_ID_HEADER)
  }

  fn set_request_signature(&mut self, signer: &RequestSigner) -> HttpAuthResult<()> {
    let signature = signer.sign(self.method().as_str(), relative_url(self.uri()))?;
    let headers = self.headers_mut();
    headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(&signature)?);
    headers.insert(SIGNATURE_KEY_ID_HEADER, HeaderValue::from_str(signer.key_id())?);
    Ok(())
  }

  fn verify_request_signature(&self, public_key: &PublicKey) -> HttpAuthResult<KeyId> {
    let key_id = header_str(self.headers(), SIGNATURE_KEY_ID_HEADER)?;
    let signature = header_str(self.headers(), SIGNATURE_HEADER)?;
    SigningInput::new(self.method().as_str(), key_id, relative_url(self.uri())).verify(public_key, signature)?;
    Ok(key_id.to_string())
  }
}

/// Relative url as signed: path and query, without scheme and authority
fn relative_url(uri: &Uri) -> &str {
  uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> HttpAuthResult<&'a str> {
  let value = headers.get(name).ok_or(HttpAuthError::MissingHeader(name))?;
  Ok(value.to_str()?)
}

/* --------------------------------------- */
/// Build a signed API request with a json body.
/// The signature covers the relative url only, so the base url can change without re-signing semantics.
pub fn build_signed_request<T>(
  config: &ApiConfig,
  signer: &RequestSigner,
  method: Method,
  path: &str,
  body: Option<&T>,
) -> HttpAuthResult<Request<Bytes>>
where
  T: Serialize + ?Sized,
{
  let body = match body {
    Some(body) => Bytes::from(serde_json::to_vec(body)?),
    None => Bytes::new(),
  };
  let mut request = Request::builder()
    .method(method)
    .uri(config.url(path))
    .header(header::CONTENT_TYPE, "application/json")
    .body(body)?;
  request.set_request_signature(signer)?;
  Ok(request)
}
