use auth::Error;
use auth::IdentityClaim;
use auth::JwtHandler;

use crate::domain::login::ports::TokenIssuer;

impl TokenIssuer for JwtHandler {
    fn issue(&self, identity: IdentityClaim) -> Result<String, Error> {
        JwtHandler::issue(self, identity)
    }
}
