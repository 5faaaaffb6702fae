//! YouTrack API client implementation.
//!
//! [`YouTrackClient`] composes a [`Transport`] with the resolved
//! [`TransportConfig`] and implements the domain operations of
//! [`YouTrackApi`] on top of it. Every operation awaits its requests one after
//! another; there are no retries and no local recovery.

use std::future::Future;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::auth::{TokenAuth, TokenAuthentication};
use super::error::{ApiError, InvalidValueError, Result};
use super::transport::{
    ApiRequest, ApiResponse, ClientConfig, ReqwestTransport, Transport, TransportConfig,
};
use super::types::{
    Bundle, CreateIssueRequest, CreatedIssue, EnumValue, Issue, ProjectCustomField,
    ProjectCustomFields, ProjectInfo, ProjectRecord,
};
use crate::config::{Profile, Settings};

/// Fields requested when listing projects.
const PROJECT_LIST_FIELDS: &str = "id,name";

/// Fields requested when looking a project up by name.
const PROJECT_LOOKUP_FIELDS: &str = "id,name,shortName";

/// Fields requested for an enum bundle.
const BUNDLE_FIELDS: &str = "id,name,values(name,id,description,ordinal)";

/// Fields requested when listing a project's custom fields.
const PROJECT_CUSTOM_FIELDS_FIELDS: &str = "customFields(id, name)";

/// Fields requested when resolving a project custom field's name.
const CUSTOM_FIELD_NAME_FIELDS: &str = "field(name)";

/// Fields requested for issue queries.
pub const ISSUE_FIELDS: &str = "$type,created,customFields($type,id,name,projectCustomField($type,field($type,fieldType($type,id),id,localizedName,name),id),value($type,id,name,text,value)),description,id,idReadable,links($type,direction,id,linkType($type,id,localizedName,name)),numberInProject,project($type,id,name,shortName),reporter($type,id,login,name,ringId),resolved,summary,updated,updater($type,id,login,name,ringId),usesMarkdown,visibility($type,id,permittedGroups($type,id,name,ringId),permittedUsers($type,id,login,name,ringId))";

/// Per-request options: query parameters, JSON body and extra headers.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    query: Vec<(String, String)>,
    json: Option<Value>,
    headers: reqwest::header::HeaderMap,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter. Order is preserved.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Shorthand for the `fields` projection parameter.
    pub fn fields(self, fields: &str) -> Self {
        self.query("fields", fields)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Set a header for this request only, replacing the client's value.
    pub fn header(
        mut self,
        name: reqwest::header::HeaderName,
        value: reqwest::header::HeaderValue,
    ) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Domain operations of the YouTrack REST API.
pub trait YouTrackApi {
    /// All projects visible to the token (`id` and `name` only, single page).
    fn get_all_projects(&self) -> impl Future<Output = Result<Vec<ProjectInfo>>> + Send;

    /// The first project matching `name`, or `None` when nothing matches.
    fn get_project_info_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<ProjectInfo>>> + Send;

    /// Create `issue` in `project` and record the id the server assigns.
    fn create_issue<'a>(
        &self,
        project: &ProjectInfo,
        issue: &'a mut Issue,
    ) -> impl Future<Output = Result<&'a mut Issue>> + Send;

    /// Allowed values of an enum field's bundle, in server order.
    fn get_enum_available_values(
        &self,
        project_id: &str,
        enum_field_id: &str,
    ) -> impl Future<Output = Result<Vec<EnumValue>>> + Send;

    /// Issues matching a YouTrack search query, as raw JSON.
    fn get_issues(&self, query: &str) -> impl Future<Output = Result<Vec<Value>>> + Send;

    /// Names of a project's custom fields, in the order the project lists them.
    fn get_project_custom_fields_names(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// The REST API URL requests are sent to.
    fn api_url(&self) -> &str;

    /// The tracker URL used for human-facing links.
    fn base_url(&self) -> &str;
}

/// The YouTrack API client.
#[derive(Debug)]
pub struct YouTrackClient<T = ReqwestTransport> {
    transport: T,
    config: TransportConfig,
    api_url: String,
    base_url: String,
}

impl YouTrackClient<ReqwestTransport> {
    /// Create a client using the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be sent as a header, if the API
    /// URL or a configured base URI is not a valid URL, or if the HTTP client
    /// cannot be built.
    pub fn new<A: TokenAuthentication + ?Sized>(
        auth: &A,
        base_url: &str,
        config: ClientConfig,
    ) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::with_transport(auth, base_url, config, transport)
    }

    /// Create a client from a configured profile.
    ///
    /// Retrieves the token from the OS keyring.
    #[instrument(skip(profile, settings), fields(profile_name = %profile.name))]
    pub fn from_profile(profile: &Profile, settings: &Settings) -> crate::Result<Self> {
        info!("Creating YouTrack client for profile");

        profile.validate()?;
        let auth = TokenAuth::from_keyring(&profile.name, &profile.api_url())?;
        let client = Self::new(&auth, &profile.url, settings.client_config()?)?;

        Ok(client)
    }
}

impl<T: Transport> YouTrackClient<T> {
    /// Create a client over any transport.
    pub fn with_transport<A: TokenAuthentication + ?Sized>(
        auth: &A,
        base_url: &str,
        config: ClientConfig,
        transport: T,
    ) -> Result<Self> {
        let config = TransportConfig::from_auth(auth)?.merge(config)?;
        debug!(base_uri = %config.base_uri(), "YouTrack client configured");

        Ok(Self {
            transport,
            config,
            api_url: auth.api_url().to_string(),
            base_url: base_url.to_string(),
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Link to an issue in the tracker's web UI.
    pub fn issue_url(&self, readable_id: &str) -> String {
        format!(
            "{}/issue/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(readable_id)
        )
    }

    /// Issue a request and decode the body as JSON.
    ///
    /// Returns `None` when the body is JSON `null`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx statuses, and malformed JSON.
    pub async fn request_and_decode(
        &self,
        method: Method,
        uri: &str,
        options: RequestOptions,
    ) -> Result<Option<Value>> {
        let response = self.execute(method, uri, options).await?;
        let value: Value = serde_json::from_str(&response.body)?;
        Ok((!value.is_null()).then_some(value))
    }

    /// Issue a request and decode the body into `D`.
    pub async fn request_json<D: DeserializeOwned>(
        &self,
        method: Method,
        uri: &str,
        options: RequestOptions,
    ) -> Result<D> {
        let response = self.execute(method, uri, options).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Build the request, send it, and turn non-2xx statuses into errors.
    async fn execute(&self, method: Method, uri: &str, options: RequestOptions) -> Result<ApiResponse> {
        let mut url = self.config.resolve(uri)?;
        if !options.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &options.query {
                pairs.append_pair(key, value);
            }
        }

        let mut headers = self.config.headers().clone();
        headers.extend(options.headers);

        let request = ApiRequest {
            method,
            url,
            headers,
            body: options.json,
        };
        let url = request.url.to_string();

        let response = self.transport.send(request).await?;
        if response.status.is_success() {
            Ok(response)
        } else {
            debug!("Error response body: {}", response.body);
            Err(error_from_response(response.status, &url, &response.body))
        }
    }
}

impl<T: Transport> YouTrackApi for YouTrackClient<T> {
    #[instrument(skip(self))]
    async fn get_all_projects(&self) -> Result<Vec<ProjectInfo>> {
        let projects: Vec<ProjectInfo> = self
            .request_json(
                Method::GET,
                "admin/projects",
                RequestOptions::new().fields(PROJECT_LIST_FIELDS),
            )
            .await?;

        debug!("Found {} projects", projects.len());
        Ok(projects)
    }

    #[instrument(skip(self))]
    async fn get_project_info_by_name(&self, name: &str) -> Result<Option<ProjectInfo>> {
        let matches: Vec<Value> = self
            .request_json(
                Method::GET,
                "admin/projects",
                RequestOptions::new()
                    .fields(PROJECT_LOOKUP_FIELDS)
                    .query("query", name),
            )
            .await?;

        let Some(first) = matches.into_iter().next() else {
            debug!("No project matches");
            return Ok(None);
        };

        let record: ProjectRecord = serde_json::from_value(first)?;
        Ok(Some(ProjectInfo::try_from(record)?))
    }

    #[instrument(skip(self, project, issue), fields(project_id = %project.id()))]
    async fn create_issue<'a>(
        &self,
        project: &ProjectInfo,
        issue: &'a mut Issue,
    ) -> Result<&'a mut Issue> {
        if let Some(id) = issue.id() {
            return Err(InvalidValueError::new(format!("issue '{}' has already been created", id)).into());
        }

        let body = serde_json::to_value(CreateIssueRequest::new(project, issue))?;
        let created: CreatedIssue = self
            .request_json(Method::POST, "issues", RequestOptions::new().json(body))
            .await?;

        let id = created
            .id
            .ok_or_else(|| ApiError::InvalidResponse("created issue has no id".to_string()))?;
        issue.set_id(id)?;

        info!(issue_id = ?issue.id(), "Issue created");
        Ok(issue)
    }

    #[instrument(skip(self))]
    async fn get_enum_available_values(
        &self,
        project_id: &str,
        enum_field_id: &str,
    ) -> Result<Vec<EnumValue>> {
        let uri = format!(
            "admin/projects/{}/customFields/{}/bundle/",
            urlencoding::encode(project_id),
            urlencoding::encode(enum_field_id)
        );
        let bundle: Bundle = self
            .request_json(Method::GET, &uri, RequestOptions::new().fields(BUNDLE_FIELDS))
            .await?;

        Ok(bundle.values)
    }

    #[instrument(skip(self))]
    async fn get_issues(&self, query: &str) -> Result<Vec<Value>> {
        let issues: Vec<Value> = self
            .request_json(
                Method::GET,
                "issues",
                RequestOptions::new()
                    .fields(ISSUE_FIELDS)
                    .query("query", query),
            )
            .await?;

        debug!("Found {} issues", issues.len());
        Ok(issues)
    }

    #[instrument(skip(self))]
    async fn get_project_custom_fields_names(&self, project_id: &str) -> Result<Vec<String>> {
        let project_uri = format!("admin/projects/{}", urlencoding::encode(project_id));
        let project: ProjectCustomFields = self
            .request_json(
                Method::GET,
                &project_uri,
                RequestOptions::new().fields(PROJECT_CUSTOM_FIELDS_FIELDS),
            )
            .await?;

        let mut names = Vec::with_capacity(project.custom_fields.len());
        for field_ref in &project.custom_fields {
            let uri = format!(
                "{}/customFields/{}",
                project_uri,
                urlencoding::encode(&field_ref.id)
            );
            let field: ProjectCustomField = self
                .request_json(
                    Method::GET,
                    &uri,
                    RequestOptions::new().fields(CUSTOM_FIELD_NAME_FIELDS),
                )
                .await?;
            names.push(field.field.name);
        }

        debug!("Resolved {} custom field names", names.len());
        Ok(names)
    }

    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Create an appropriate error from an HTTP response.
///
/// YouTrack error bodies look like
/// `{"error": "Not Found", "error_description": "Entity with id 0-9 not found"}`.
fn error_from_response(status: StatusCode, url: &str, body: &str) -> ApiError {
    let context = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            ["error_description", "error"]
                .iter()
                .filter_map(|key| json.get(*key).and_then(Value::as_str))
                .find(|message| !message.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| url.to_string());

    ApiError::from_status(status, &context)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use reqwest::header;
    use serde_json::json;

    use super::*;
    use crate::api::types::CustomField;

    /// Replays canned responses and records every request it receives.
    #[derive(Default)]
    struct FakeTransport {
        responses: Mutex<VecDeque<ApiResponse>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl FakeTransport {
        fn new(responses: Vec<ApiResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected request"))
        }
    }

    fn client(responses: Vec<ApiResponse>) -> YouTrackClient<FakeTransport> {
        let auth = TokenAuth::new("abc", "https://tracker.example/api/");
        YouTrackClient::with_transport(
            &auth,
            "https://tracker.example",
            ClientConfig::default(),
            FakeTransport::new(responses),
        )
        .unwrap()
    }

    fn query_of(request: &ApiRequest) -> Vec<(String, String)> {
        request.url.query_pairs().into_owned().collect()
    }

    fn path_of(request: &ApiRequest) -> &str {
        request.url.path()
    }

    #[test]
    fn test_urls() {
        let client = client(vec![]);
        assert_eq!(client.api_url(), "https://tracker.example/api/");
        assert_eq!(client.base_url(), "https://tracker.example");
        assert_eq!(
            client.issue_url("DEMO-12"),
            "https://tracker.example/issue/DEMO-12"
        );
    }

    #[test]
    fn test_api_url_unaffected_by_base_uri_override() {
        let auth = TokenAuth::new("abc", "https://tracker.example/api/");
        let client = YouTrackClient::with_transport(
            &auth,
            "https://tracker.example",
            ClientConfig::new().base_uri("https://proxy.example/api/"),
            FakeTransport::default(),
        )
        .unwrap();

        assert_eq!(client.api_url(), "https://tracker.example/api/");
        assert_eq!(client.config().base_uri().as_str(), "https://proxy.example/api/");
    }

    #[tokio::test]
    async fn test_requests_carry_mandatory_headers() {
        let client = client(vec![ApiResponse::json(&json!([]))]);
        client.get_all_projects().await.unwrap();

        let requests = client.transport().requests();
        let headers = &requests[0].headers;
        assert_eq!(headers[header::AUTHORIZATION], "Bearer abc");
        assert_eq!(headers[header::ACCEPT], "application/json");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn test_get_all_projects() {
        let client = client(vec![ApiResponse::json(&json!([
            {"$type": "Project", "id": "0-0", "name": "Demo"},
            {"$type": "Project", "id": "0-1", "name": "Support"}
        ]))]);

        let projects = client.get_all_projects().await.unwrap();
        assert_eq!(
            projects,
            vec![
                ProjectInfo::new("0-0", "Demo").unwrap(),
                ProjectInfo::new("0-1", "Support").unwrap()
            ]
        );

        let requests = client.transport().requests();
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(
            requests[0].url.as_str(),
            "https://tracker.example/api/admin/projects?fields=id%2Cname"
        );
    }

    #[tokio::test]
    async fn test_get_project_info_by_name_empty_is_none() {
        let client = client(vec![ApiResponse::json(&json!([]))]);

        let project = client.get_project_info_by_name("Nope").await.unwrap();
        assert_eq!(project, None);
    }

    #[tokio::test]
    async fn test_get_project_info_by_name_takes_first_match() {
        let client = client(vec![ApiResponse::json(&json!([
            {"id": "0-1", "name": "Demo", "shortName": "DEMO"},
            {"id": "0-2", "name": "Demo Archive", "shortName": "DEMOA"}
        ]))]);

        let project = client.get_project_info_by_name("Demo").await.unwrap();
        assert_eq!(project, Some(ProjectInfo::new("0-1", "Demo").unwrap()));

        let requests = client.transport().requests();
        assert_eq!(path_of(&requests[0]), "/api/admin/projects");
        assert_eq!(
            query_of(&requests[0]),
            vec![
                ("fields".to_string(), "id,name,shortName".to_string()),
                ("query".to_string(), "Demo".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_get_project_info_by_name_rejects_nameless_project() {
        let client = client(vec![ApiResponse::json(&json!([{"id": "0-1", "name": ""}]))]);

        let err = client.get_project_info_by_name("Demo").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidValue(_)));
    }

    #[tokio::test]
    async fn test_create_issue_sets_id_on_same_issue() {
        let client = client(vec![ApiResponse::json(&json!({"$type": "Issue", "id": "2-15"}))]);
        let project = ProjectInfo::new("0-1", "Demo").unwrap();
        let mut issue = Issue::new("Crash", "On start").with_custom_field(CustomField::new(
            "Priority",
            "SingleEnumIssueCustomField",
            json!({"name": "Major"}),
        ));

        let returned = client.create_issue(&project, &mut issue).await.unwrap();
        assert_eq!(returned.id(), Some("2-15"));
        assert_eq!(issue.id(), Some("2-15"));

        let requests = client.transport().requests();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].url.as_str(), "https://tracker.example/api/issues");
        assert_eq!(
            requests[0].body,
            Some(json!({
                "project": {"id": "0-1"},
                "summary": "Crash",
                "description": "On start",
                "customFields": [
                    {"name": "Priority", "$type": "SingleEnumIssueCustomField", "value": {"name": "Major"}}
                ]
            }))
        );
    }

    #[tokio::test]
    async fn test_create_issue_without_id_in_response_fails() {
        let client = client(vec![
            ApiResponse::json(&json!({"$type": "Issue"})),
            ApiResponse::json(&json!({"$type": "Issue"})),
        ]);
        let project = ProjectInfo::new("0-1", "Demo").unwrap();

        for _ in 0..2 {
            let mut issue = Issue::new("Crash", "");
            let err = client.create_issue(&project, &mut issue).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidResponse(_)));
            assert_eq!(issue.id(), None);
        }
    }

    #[tokio::test]
    async fn test_create_issue_rejects_already_created_issue() {
        let client = client(vec![]);
        let project = ProjectInfo::new("0-1", "Demo").unwrap();
        let mut issue = Issue::new("Crash", "");
        issue.set_id("2-1").unwrap();

        let err = client.create_issue(&project, &mut issue).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidValue(_)));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_enum_available_values() {
        let client = client(vec![ApiResponse::json(&json!({
            "$type": "EnumBundle",
            "id": "67-2",
            "name": "Priorities",
            "values": [
                {"$type": "EnumBundleElement", "id": "67-5", "name": "Major", "description": "Soon", "ordinal": 1},
                {"$type": "EnumBundleElement", "id": "67-4", "name": "Critical", "description": null, "ordinal": 0}
            ]
        }))]);

        let values = client.get_enum_available_values("0-1", "92-3").await.unwrap();
        let element_type = || {
            let mut extra = serde_json::Map::new();
            extra.insert("$type".to_string(), json!("EnumBundleElement"));
            extra
        };
        assert_eq!(
            values,
            vec![
                EnumValue {
                    id: Some("67-5".to_string()),
                    name: Some("Major".to_string()),
                    description: Some("Soon".to_string()),
                    ordinal: Some(1),
                    extra: element_type(),
                },
                EnumValue {
                    id: Some("67-4".to_string()),
                    name: Some("Critical".to_string()),
                    description: None,
                    ordinal: Some(0),
                    extra: element_type(),
                },
            ]
        );

        let requests = client.transport().requests();
        assert_eq!(
            path_of(&requests[0]),
            "/api/admin/projects/0-1/customFields/92-3/bundle/"
        );
        assert_eq!(
            query_of(&requests[0]),
            vec![(
                "fields".to_string(),
                "id,name,values(name,id,description,ordinal)".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_get_enum_available_values_without_values_fails() {
        let client = client(vec![ApiResponse::json(&json!({"id": "67-2", "name": "Priorities"}))]);

        let err = client.get_enum_available_values("0-1", "92-3").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_get_enum_available_values_keeps_elements_without_name() {
        let client = client(vec![ApiResponse::json(&json!({
            "values": [
                {"$type": "EnumBundleElement", "id": "67-9"},
                {"$type": "EnumBundleElement", "id": "67-5", "name": "Major"}
            ]
        }))]);

        let values = client.get_enum_available_values("0-1", "92-3").await.unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].id.as_deref(), Some("67-9"));
        assert_eq!(values[0].name, None);
        assert_eq!(values[1].name.as_deref(), Some("Major"));
    }

    #[tokio::test]
    async fn test_get_issues_passes_query_verbatim() {
        let client = client(vec![ApiResponse::json(&json!([
            {"$type": "Issue", "id": "2-1", "idReadable": "DEMO-1", "summary": "Crash"}
        ]))]);

        let issues = client
            .get_issues("project: DEMO #Unresolved sort by: updated")
            .await
            .unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0]["idReadable"], "DEMO-1");

        let requests = client.transport().requests();
        assert_eq!(path_of(&requests[0]), "/api/issues");
        assert_eq!(
            query_of(&requests[0]),
            vec![
                ("fields".to_string(), ISSUE_FIELDS.to_string()),
                (
                    "query".to_string(),
                    "project: DEMO #Unresolved sort by: updated".to_string()
                )
            ]
        );
    }

    #[tokio::test]
    async fn test_get_project_custom_fields_names() {
        let client = client(vec![
            ApiResponse::json(&json!({
                "$type": "Project",
                "customFields": [
                    {"$type": "EnumProjectCustomField", "id": "92-3"},
                    {"$type": "StateProjectCustomField", "id": "92-1"},
                    {"$type": "UserProjectCustomField", "id": "92-7"}
                ]
            })),
            ApiResponse::json(&json!({"field": {"name": "Priority"}})),
            ApiResponse::json(&json!({"field": {"name": "State"}})),
            ApiResponse::json(&json!({"field": {"name": "Assignee"}})),
        ]);

        let names = client.get_project_custom_fields_names("0-1").await.unwrap();
        assert_eq!(names, vec!["Priority", "State", "Assignee"]);

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(path_of(&requests[0]), "/api/admin/projects/0-1");
        assert_eq!(
            query_of(&requests[0]),
            vec![("fields".to_string(), "customFields(id, name)".to_string())]
        );
        let sub_paths: Vec<&str> = requests[1..].iter().map(path_of).collect();
        assert_eq!(
            sub_paths,
            vec![
                "/api/admin/projects/0-1/customFields/92-3",
                "/api/admin/projects/0-1/customFields/92-1",
                "/api/admin/projects/0-1/customFields/92-7"
            ]
        );
        assert_eq!(
            query_of(&requests[1]),
            vec![("fields".to_string(), "field(name)".to_string())]
        );
    }

    #[tokio::test]
    async fn test_get_project_custom_fields_names_without_fields() {
        let client = client(vec![ApiResponse::json(&json!({"$type": "Project"}))]);

        let names = client.get_project_custom_fields_names("0-1").await.unwrap();
        assert!(names.is_empty());
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_request_and_decode() {
        let client = client(vec![
            ApiResponse::json(&json!({"id": "1-1"})),
            ApiResponse::new(StatusCode::OK, "null"),
            ApiResponse::new(StatusCode::OK, "{not json"),
        ]);

        let value = client
            .request_and_decode(Method::GET, "users/me", RequestOptions::new().fields("id"))
            .await
            .unwrap();
        assert_eq!(value, Some(json!({"id": "1-1"})));

        let value = client
            .request_and_decode(Method::GET, "users/me", RequestOptions::new())
            .await
            .unwrap();
        assert_eq!(value, None);

        let err = client
            .request_and_decode(Method::GET, "users/me", RequestOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_request_options_header_overrides_for_one_request() {
        let client = client(vec![ApiResponse::json(&json!({})), ApiResponse::json(&json!({}))]);

        client
            .request_and_decode(
                Method::GET,
                "users/me",
                RequestOptions::new().header(
                    header::ACCEPT,
                    header::HeaderValue::from_static("text/plain"),
                ),
            )
            .await
            .unwrap();
        client
            .request_and_decode(Method::GET, "users/me", RequestOptions::new())
            .await
            .unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests[0].headers[header::ACCEPT], "text/plain");
        assert_eq!(requests[1].headers[header::ACCEPT], "application/json");
    }

    #[tokio::test]
    async fn test_error_status_uses_error_description() {
        let client = client(vec![ApiResponse::new(
            StatusCode::NOT_FOUND,
            r#"{"error":"Not Found","error_description":"Entity with id 0-9 not found"}"#,
        )]);

        let err = client.get_project_custom_fields_names("0-9").await.unwrap_err();
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "Entity with id 0-9 not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_body_uses_url() {
        let client = client(vec![ApiResponse::new(StatusCode::UNAUTHORIZED, "")]);

        let err = client.get_all_projects().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_error_from_response_falls_back_to_error_then_url() {
        let err = error_from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "https://tracker.example/api/issues",
            r#"{"error":"server_error"}"#,
        );
        assert!(err.to_string().contains("server_error"));

        let err = error_from_response(
            StatusCode::NOT_FOUND,
            "https://tracker.example/api/issues",
            "<html>gateway</html>",
        );
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "https://tracker.example/api/issues"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }
}
