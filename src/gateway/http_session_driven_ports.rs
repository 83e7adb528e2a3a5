use crate::domain;
use crate::domain::DrivenPortError;
use crate::domain::session::{Credentials, NewAccount, User};
use crate::external_connections::ExternalConnectivity;
use serde::{Deserialize, Serialize};

const LOGIN_PATH: &str = "/api/login";
const USER_PATH: &str = "/api/user";
const REGISTER_PATH: &str = "/api/register";
const LOGOUT_PATH: &str = "/api/logout";

#[derive(Deserialize, Debug)]
struct RemoteUser {
    #[serde(rename = "_id", alias = "id", default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    email: String,
    #[serde(default)]
    token: Option<String>,
}

impl From<RemoteUser> for User {
    fn from(value: RemoteUser) -> Self {
        User {
            id: value.id.filter(|id| !id.is_empty()),
            email: value.email,
            name: value.name,
            token: value.token,
        }
    }
}

#[derive(Serialize)]
struct LoginBody<'creds> {
    email: &'creds str,
    password: &'creds str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
struct RegisterBody<'account> {
    name: &'account str,
    email: &'account str,
    password: &'account str,
}

pub struct HttpSessionReader;

impl domain::session::driven_ports::SessionReader for HttpSessionReader {
    async fn who_am_i(
        &self,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<User, DrivenPortError> {
        let response = ext_cxn
            .http_client()
            .get(ext_cxn.endpoint(USER_PATH))
            .send()
            .await
            .map_err(|err| super::comms_failure(err, "trying to fetch the current user"))?;
        let user: RemoteUser = super::decode(response, "trying to read the current user").await?;

        Ok(user.into())
    }
}

pub struct HttpSessionWriter;

impl domain::session::driven_ports::SessionWriter for HttpSessionWriter {
    async fn login(
        &self,
        credentials: &Credentials,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<String, DrivenPortError> {
        let response = ext_cxn
            .http_client()
            .post(ext_cxn.endpoint(LOGIN_PATH))
            .json(&LoginBody {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(|err| super::comms_failure(err, "trying to log in"))?;
        let login: LoginResponse = super::decode(response, "trying to read the login reply").await?;

        Ok(login.message)
    }

    async fn register(
        &self,
        account: &NewAccount,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<User, DrivenPortError> {
        let response = ext_cxn
            .http_client()
            .post(ext_cxn.endpoint(REGISTER_PATH))
            .json(&RegisterBody {
                name: &account.name,
                email: &account.email,
                password: &account.password,
            })
            .send()
            .await
            .map_err(|err| super::comms_failure(err, "trying to register"))?;
        let user: RemoteUser =
            super::decode(response, "trying to read the registered user").await?;

        Ok(user.into())
    }

    async fn logout(&self, ext_cxn: &impl ExternalConnectivity) -> Result<(), DrivenPortError> {
        let response = ext_cxn
            .http_client()
            .post(ext_cxn.endpoint(LOGOUT_PATH))
            .send()
            .await
            .map_err(|err| super::comms_failure(err, "trying to log out"))?;
        super::check_status(response).await?;

        Ok(())
    }
}
