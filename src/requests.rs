//! Typed parameters for each verification workflow.

use serde::Deserialize;

use crate::parameters::Parameters;

pub const COMMAND_BACKGROUND_CHECK_SUBMIT: &str = "background_check/submit_request";
pub const COMMAND_BACKGROUND_CHECK_RESULT: &str = "background_check/check_result";
pub const COMMAND_MAILING_ADDRESS_SEND: &str = "mailing_address/send_code";
pub const COMMAND_MAILING_ADDRESS_CHECK: &str = "mailing_address/check_code";
pub const COMMAND_PHONE_NUMBER_SEND: &str = "phone_number/send_code";
pub const COMMAND_PHONE_NUMBER_CHECK: &str = "phone_number/check_code";
pub const COMMAND_LICENSE_SUBMIT: &str = "license/submit_request";

/// A signed API call: where it goes and which parameters it carries.
pub trait Request {
    fn command(&self) -> &'static str;

    fn append_to(&self, params: &mut Parameters);

    fn to_parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        self.append_to(&mut params);
        params
    }
}

/// Which records the background check searches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    Electronic,
    Recent,
    All,
}

impl CheckType {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckType::Electronic => "electronic",
            CheckType::Recent => "recent",
            CheckType::All => "all",
        }
    }
}

/// Optional background check settings.
///
/// `None` leaves the value to the server, which fails the check on every
/// kind of finding and runs an `electronic` check.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackgroundCheckOptions {
    /// Fail if a misdemeanor is found.
    pub fail_on_misdemeanor: Option<bool>,
    /// Fail if a felony is found.
    pub fail_on_felony: Option<bool>,
    /// Fail if a DUI or related offense is found.
    pub fail_on_dui: Option<bool>,
    /// Fail if a sex offense is found.
    pub fail_on_sex_offense: Option<bool>,
    /// Fail if the subject appears on the OFAC terrorist list.
    pub fail_on_terrorist: Option<bool>,
    pub check_type: Option<CheckType>,
}

impl BackgroundCheckOptions {
    fn append_to(&self, params: &mut Parameters) {
        params
            .insert_opt("fail_on_misdemeanor", self.fail_on_misdemeanor)
            .insert_opt("fail_on_felony", self.fail_on_felony)
            .insert_opt("fail_on_dui", self.fail_on_dui)
            .insert_opt("fail_on_sex_offense", self.fail_on_sex_offense)
            .insert_opt("fail_on_terrorist", self.fail_on_terrorist)
            .insert_opt("check_type", self.check_type.map(CheckType::as_str));
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackgroundCheckRequest {
    pub first_name: String,
    pub last_name: String,
    /// Date of birth as `MMDDYYYY`.
    pub dob: String,
    pub ssn: String,
    pub email: String,
    /// Pinged by the server once the check completes.
    pub callback_url: String,
    pub options: BackgroundCheckOptions,
}

impl Request for BackgroundCheckRequest {
    fn command(&self) -> &'static str {
        COMMAND_BACKGROUND_CHECK_SUBMIT
    }

    fn append_to(&self, params: &mut Parameters) {
        params
            .insert("first_name", &self.first_name)
            .insert("last_name", &self.last_name)
            .insert("dob", &self.dob)
            .insert("ssn", &self.ssn)
            .insert("email", &self.email)
            .insert("callback_url", &self.callback_url);
        self.options.append_to(params);
    }
}

/// Looks up a submitted background check.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundCheckLookup {
    pub request_id: String,
}

impl Request for BackgroundCheckLookup {
    fn command(&self) -> &'static str {
        COMMAND_BACKGROUND_CHECK_RESULT
    }

    fn append_to(&self, params: &mut Parameters) {
        params.insert("request_id", &self.request_id);
    }
}

/// Result of a background check as reported by the server.
///
/// Fields the server adds beyond the documented ones end up in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BackgroundCheckResult {
    pub status: Option<String>,
    pub ssn_valid: Option<bool>,
    pub background_check_passed: Option<bool>,
    pub request_id: Option<String>,
    pub ext_user_id: Option<String>,
    pub signature: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Postcard delivery of a code to a mailing address.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MailingAddressRequest {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub email: String,
}

impl Request for MailingAddressRequest {
    fn command(&self) -> &'static str {
        COMMAND_MAILING_ADDRESS_SEND
    }

    fn append_to(&self, params: &mut Parameters) {
        params
            .insert("first_name", &self.first_name)
            .insert("last_name", &self.last_name)
            .insert("address", &self.address)
            .insert_opt("address2", self.address2.as_ref())
            .insert("city", &self.city)
            .insert("state", &self.state)
            .insert("zip", &self.zip)
            .insert("email", &self.email);
    }
}

/// How a phone verification code is delivered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeDelivery {
    #[default]
    Sms,
    Voice,
}

impl CodeDelivery {
    pub fn as_str(self) -> &'static str {
        match self {
            CodeDelivery::Sms => "sms",
            CodeDelivery::Voice => "voice",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhoneNumberRequest {
    pub phone_number: String,
    pub email: String,
    pub delivery: CodeDelivery,
}

impl Request for PhoneNumberRequest {
    fn command(&self) -> &'static str {
        COMMAND_PHONE_NUMBER_SEND
    }

    fn append_to(&self, params: &mut Parameters) {
        params
            .insert("phone_number", &self.phone_number)
            .insert("email", &self.email)
            .insert("type", self.delivery.as_str());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfessionalLicenseRequest {
    pub first_name: String,
    pub last_name: String,
    pub state: String,
    pub license_type: String,
    pub license_number: String,
    pub callback_url: String,
    pub email: String,
}

impl Request for ProfessionalLicenseRequest {
    fn command(&self) -> &'static str {
        COMMAND_LICENSE_SUBMIT
    }

    fn append_to(&self, params: &mut Parameters) {
        params
            .insert("first_name", &self.first_name)
            .insert("last_name", &self.last_name)
            .insert("state", &self.state)
            .insert("license_type", &self.license_type)
            .insert("license_number", &self.license_number)
            .insert("callback_url", &self.callback_url)
            .insert("email", &self.email);
    }
}

/// Which code-delivery workflow a [`CodeCheck`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeChannel {
    MailingAddress,
    PhoneNumber,
}

/// A code entered by the user, checked against the request it was sent for.
#[derive(Clone, Debug, PartialEq)]
pub struct CodeCheck {
    pub channel: CodeChannel,
    pub code: String,
    pub request_id: String,
}

impl Request for CodeCheck {
    fn command(&self) -> &'static str {
        match self.channel {
            CodeChannel::MailingAddress => COMMAND_MAILING_ADDRESS_CHECK,
            CodeChannel::PhoneNumber => COMMAND_PHONE_NUMBER_CHECK,
        }
    }

    fn append_to(&self, params: &mut Parameters) {
        params
            .insert("code", &self.code)
            .insert("request_id", &self.request_id);
    }
}
