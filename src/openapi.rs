use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json, session};

pub const SECURITY_SCHEME_SESSION: &str = "Session";
pub const SECURITY_SCHEME_BEARER: &str = "Bearer";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const POST: &str = "Post";
	pub const COMMENT: &str = "Comment";
	pub const USER: &str = "User";
	pub const CONTACT: &str = "Contact";
	pub const STATS: &str = "Stats";
}

fn tag(name: &str, description: &str) -> Tag {
	Tag {
		name: name.into(),
		description: Some(description.into()),
		..Default::default()
	}
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("BlogHub API")
		.summary("Posts, comments, likes and follows for the BlogHub blogging platform")
		.description(
			"Every mutating route requires a session, passed either as the `session` cookie \
			 set by `/auth/login` and `/auth/register` or as an `Authorization: Bearer` token. \
			 Errors are returned as a list of messages with stable `content` codes.",
		)
		.tag(tag(tag::AUTH, "Registration, login and the authenticated user"))
		.tag(tag(tag::POST, "Posts, their likes and category statistics"))
		.tag(tag(tag::COMMENT, "Comments and replies on posts"))
		.tag(tag(tag::USER, "Public profiles and follows"))
		.tag(tag(tag::CONTACT, "The contact form"))
		.tag(tag(tag::STATS, "Platform-wide statistics for admins"))
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: session::COOKIE_NAME.into(),
				description: Some("A user session cookie".into()),
				extensions: Default::default(),
			},
		)
		.security_scheme(
			SECURITY_SCHEME_BEARER,
			SecurityScheme::Http {
				scheme: "bearer".into(),
				bearer_format: Some("uuid".into()),
				description: Some("The session token returned on login".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::ErrorBody>, _>(|res| {
			res.example(error::ErrorBody {
				errors: error::Message::new("unknown_post")
					.detail("post", "5f0c6d5e-3b4a-4f43-9a55-0c1d2e3f4a5b")
					.into_vec(),
			})
		})
}
