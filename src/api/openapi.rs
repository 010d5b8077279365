use crate::api::schemas::{ErrorDetail, ErrorResponse};
use utoipa::openapi::path::{HttpMethod, OperationBuilder, ParameterBuilder, ParameterIn};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::schema::{ArrayBuilder, KnownFormat, ObjectBuilder, SchemaFormat, Type};
use utoipa::openapi::security::{
    HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme,
};
use utoipa::openapi::{Content, Ref, Required, ResponseBuilder};
use utoipa::OpenApi;

// Auth
use crate::auth::adapter::incoming::web::routes::{
    AuthSessionDto, GoogleAuthRequestDto, LoginRequestDto, LogoutRequestDto,
    RefreshTokenRequestDto, RegisterUserDto, TokenPairDto, UpdateProfileDto, UserDto,
};

// CV
use crate::cv::adapter::incoming::web::routes::{CvRequestDto, SectionRoute};
use crate::cv::domain::entities::{Cv, CvDocument};
use crate::cv::domain::sections::{
    Contact, ContactSection, Education, EducationSection, Experience, ExperienceSection, Interest,
    InterestSection, Language, LanguageSection, Skill, SkillCategory, SkillSection,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CV Builder API",
        version = "1.0.0",
        description = "Accounts, profiles and CV documents for the CV builder",
        contact(
            name = "API Support",
            email = "support@example.com"
        )
    ),
    paths(
        // Auth endpoints
        crate::auth::adapter::incoming::web::routes::register_user_handler,
        crate::auth::adapter::incoming::web::routes::login_user_handler,
        crate::auth::adapter::incoming::web::routes::google_auth_handler,
        crate::auth::adapter::incoming::web::routes::refresh_token_handler,
        crate::auth::adapter::incoming::web::routes::logout_user_handler,

        // User endpoints
        crate::auth::adapter::incoming::web::routes::get_profile_handler,
        crate::auth::adapter::incoming::web::routes::patch_profile_handler,
        crate::auth::adapter::incoming::web::routes::upload_avatar_handler,

        // CV endpoints
        crate::cv::adapter::incoming::web::routes::list_cvs_handler,
        crate::cv::adapter::incoming::web::routes::create_cv_handler,
        crate::cv::adapter::incoming::web::routes::get_cv_handler,
        crate::cv::adapter::incoming::web::routes::patch_cv_handler,
        crate::cv::adapter::incoming::web::routes::delete_cv_handler,
    ),
    components(
        schemas(
            ErrorResponse,
            ErrorDetail,

            // Auth DTOs
            RegisterUserDto,
            LoginRequestDto,
            GoogleAuthRequestDto,
            RefreshTokenRequestDto,
            LogoutRequestDto,
            UpdateProfileDto,
            UserDto,
            TokenPairDto,
            AuthSessionDto,

            // CV
            CvRequestDto,
            Cv,
            CvDocument,
            Contact,
            Experience,
            Education,
            Skill,
            SkillCategory,
            Language,
            Interest
        )
    ),
    modifiers(&SecurityAddon, &SectionPaths),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "Profile endpoints for the signed-in user"),
        (name = "cvs", description = "CV documents with their nested sections"),
        (name = "sections", description = "Per-section CRUD across the caller's CVs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from login, register or refresh"))
                        .build(),
                ),
            )
        }
    }
}

/// The section endpoints share one generic handler set, so their operations
/// are described here instead of through `#[utoipa::path]`.
struct SectionPaths;

impl SectionPaths {
    fn kinds() -> [(&'static str, &'static str); 6] {
        [
            (ContactSection::PATH, "Contact"),
            (ExperienceSection::PATH, "Experience"),
            (EducationSection::PATH, "Education"),
            (SkillSection::PATH, "Skill"),
            (LanguageSection::PATH, "Language"),
            (InterestSection::PATH, "Interest"),
        ]
    }

    fn operation(schema: &str, summary: String, ok: u16, by_id: bool, with_body: bool) -> OperationBuilder {
        let mut op = OperationBuilder::new()
            .tag("sections")
            .summary(Some(summary))
            .security(SecurityRequirement::new("bearer_auth", Vec::<String>::new()))
            .response(
                ok.to_string(),
                if ok == 204 {
                    ResponseBuilder::new().description("Deleted").build()
                } else {
                    ResponseBuilder::new()
                        .description("Success")
                        .content(
                            "application/json",
                            Content::new(Some(Ref::from_schema_name(schema))),
                        )
                        .build()
                },
            )
            .response("401", error_response("Missing or invalid access token"));

        if with_body {
            op = op
                .request_body(Some(
                    RequestBodyBuilder::new()
                        .content(
                            "application/json",
                            Content::new(Some(ObjectBuilder::new().schema_type(Type::Object))),
                        )
                        .required(Some(Required::True))
                        .build(),
                ))
                .response("400", error_response("Validation failed"));
        }

        if by_id {
            op = op
                .parameter(
                    ParameterBuilder::new()
                        .name("id")
                        .parameter_in(ParameterIn::Path)
                        .required(Required::True)
                        .schema(Some(
                            ObjectBuilder::new()
                                .schema_type(Type::String)
                                .format(Some(SchemaFormat::KnownFormat(KnownFormat::Uuid))),
                        )),
                )
                .response("403", error_response("The section belongs to another user"))
                .response("404", error_response("Section not found"));
        }

        op
    }

    /// `GET` on a section collection: one page of records.
    fn list_operation(schema: &str) -> OperationBuilder {
        let link = || ObjectBuilder::new().schema_type(Type::String);
        let page = ObjectBuilder::new()
            .property("count", ObjectBuilder::new().schema_type(Type::Integer))
            .property("next", link())
            .property("previous", link())
            .property(
                "results",
                ArrayBuilder::new().items(Ref::from_schema_name(schema)),
            )
            .required("count")
            .required("results");

        OperationBuilder::new()
            .tag("sections")
            .summary(Some(format!("List {schema} sections")))
            .security(SecurityRequirement::new("bearer_auth", Vec::<String>::new()))
            .parameter(
                ParameterBuilder::new()
                    .name("page")
                    .parameter_in(ParameterIn::Query)
                    .required(Required::False)
                    .description(Some("1-based page number, 20 items per page"))
                    .schema(Some(ObjectBuilder::new().schema_type(Type::Integer))),
            )
            .response(
                "200",
                ResponseBuilder::new()
                    .description("One page of sections")
                    .content("application/json", Content::new(Some(page)))
                    .build(),
            )
            .response("401", error_response("Missing or invalid access token"))
            .response("404", error_response("Invalid page"))
    }
}

fn error_response(description: &str) -> utoipa::openapi::Response {
    ResponseBuilder::new()
        .description(description)
        .content(
            "application/json",
            Content::new(Some(Ref::from_schema_name("ErrorResponse"))),
        )
        .build()
}

impl utoipa::Modify for SectionPaths {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        for (path, schema) in Self::kinds() {
            let item = format!("{path}/{{id}}");
            let paths = &mut openapi.paths;

            paths.add_path_operation(
                path,
                vec![HttpMethod::Get],
                Self::list_operation(schema),
            );
            paths.add_path_operation(
                path,
                vec![HttpMethod::Post],
                Self::operation(schema, format!("Create a {schema} section"), 201, false, true),
            );
            paths.add_path_operation(
                &item,
                vec![HttpMethod::Get],
                Self::operation(schema, format!("Fetch a {schema} section"), 200, true, false),
            );
            paths.add_path_operation(
                &item,
                vec![HttpMethod::Put, HttpMethod::Patch],
                Self::operation(schema, format!("Update a {schema} section"), 200, true, true),
            );
            paths.add_path_operation(
                &item,
                vec![HttpMethod::Delete],
                Self::operation(schema, format!("Delete a {schema} section"), 204, true, false),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_cv_and_section_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/cvs"));
        assert!(paths.contains_key("/api/cvs/{id}"));
        assert!(paths.contains_key("/api/users/me/avatar"));
        for (path, _) in SectionPaths::kinds() {
            assert!(paths.contains_key(path), "{path} missing");
            assert!(paths.contains_key(&format!("{path}/{{id}}")));
        }
    }

    #[test]
    fn logout_reset_content_has_no_body() {
        let doc = ApiDoc::openapi();
        let post = doc.paths.paths["/api/auth/logout"]
            .post
            .as_ref()
            .expect("logout POST");

        match &post.responses.responses["205"] {
            utoipa::openapi::RefOr::T(response) => assert!(response.content.is_empty()),
            other => panic!("unexpected 205 response {other:?}"),
        }
    }

    #[test]
    fn list_operations_take_a_page_parameter() {
        let doc = ApiDoc::openapi();
        for path in ["/api/cvs", ExperienceSection::PATH] {
            let get = doc.paths.paths[path].get.as_ref().expect("list GET");
            let params = get.parameters.as_ref().expect("parameters");

            assert!(params.iter().any(|p| p.name == "page"), "{path}");
            assert!(get.responses.responses.contains_key("404"), "{path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
