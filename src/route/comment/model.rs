pub use crate::{
	model::{CommentView, CreateComment},
	route::model::{IdInput, LikeOutput},
};
