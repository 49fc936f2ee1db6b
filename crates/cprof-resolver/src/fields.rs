//! Candidate-key tables, one per payload schema.
//!
//! Each logical field resolves through an ordered list of dotted paths; the
//! first path holding a non-null value wins. Post-level paths
//! (`post_likes`, `post_comments`) are relative to one element of the array
//! found at `recent_posts`.

use cprof_core::PayloadSchema;

pub(crate) struct FieldTable {
    pub username: &'static [&'static str],
    pub display_name: &'static [&'static str],
    pub biography: &'static [&'static str],
    pub follower_count: &'static [&'static str],
    pub following_count: &'static [&'static str],
    pub post_count: &'static [&'static str],
    pub is_verified: &'static [&'static str],
    pub avatar_url: &'static [&'static str],
    /// Lifetime like total, used when no post sample is present.
    pub total_likes: &'static [&'static str],
    pub total_comments: &'static [&'static str],
    pub recent_posts: &'static [&'static str],
    pub post_likes: &'static [&'static str],
    pub post_comments: &'static [&'static str],
}

impl FieldTable {
    /// Every top-level path in the table. A payload matching none of them is
    /// unrecognizable.
    pub(crate) fn top_level_paths(&self) -> impl Iterator<Item = &'static str> {
        [
            self.username,
            self.display_name,
            self.biography,
            self.follower_count,
            self.following_count,
            self.post_count,
            self.is_verified,
            self.avatar_url,
            self.total_likes,
            self.total_comments,
            self.recent_posts,
        ]
        .into_iter()
        .flatten()
        .copied()
    }
}

/// TikTok Research API `user/info` response.
static TIKTOK_OFFICIAL: FieldTable = FieldTable {
    username: &["data.username", "username"],
    display_name: &["data.display_name", "display_name"],
    biography: &["data.bio_description", "bio_description"],
    follower_count: &["data.follower_count", "follower_count"],
    following_count: &["data.following_count", "following_count"],
    post_count: &["data.video_count", "video_count"],
    is_verified: &["data.is_verified", "is_verified"],
    avatar_url: &["data.avatar_url", "avatar_url"],
    total_likes: &["data.likes_count", "likes_count"],
    total_comments: &[],
    recent_posts: &[],
    post_likes: &[],
    post_comments: &[],
};

/// Profile-scraper records: either flat account stats or a video item with
/// an embedded `authorMeta` block.
static TIKTOK_PROFILE_JOB: FieldTable = FieldTable {
    username: &["authorMeta.name", "uniqueId", "username"],
    display_name: &["authorMeta.nickName", "nickname", "nickName"],
    biography: &["authorMeta.signature", "signature"],
    follower_count: &["authorMeta.fans", "followerCount", "fans"],
    following_count: &["authorMeta.following", "followingCount", "following"],
    post_count: &["authorMeta.video", "videoCount", "video"],
    is_verified: &["authorMeta.verified", "verified"],
    avatar_url: &["authorMeta.avatar", "avatarMedium", "avatar"],
    total_likes: &["authorMeta.heart", "heartCount", "heart"],
    total_comments: &[],
    recent_posts: &["latestVideos", "videos"],
    post_likes: &["diggCount", "stats.diggCount", "likes"],
    post_comments: &["commentCount", "stats.commentCount", "comments"],
};

/// User-scraper records (`user` + `stats` blocks, or flattened).
static TIKTOK_USER_JOB: FieldTable = FieldTable {
    username: &["user.uniqueId", "uniqueId", "username"],
    display_name: &["user.nickname", "nickname"],
    biography: &["user.signature", "signature"],
    follower_count: &["stats.followerCount", "followerCount", "followers"],
    following_count: &["stats.followingCount", "followingCount"],
    post_count: &["stats.videoCount", "videoCount"],
    is_verified: &["user.verified", "verified"],
    avatar_url: &["user.avatarLarger", "user.avatarMedium", "avatar"],
    total_likes: &["stats.heartCount", "stats.heart", "heartCount"],
    total_comments: &[],
    recent_posts: &["videos", "posts"],
    post_likes: &["stats.diggCount", "diggCount"],
    post_comments: &["stats.commentCount", "commentCount"],
};

/// Instagram profile-scraper records.
static INSTAGRAM_JOB: FieldTable = FieldTable {
    username: &["username"],
    display_name: &["fullName", "full_name"],
    biography: &["biography", "bio"],
    follower_count: &["followersCount", "edge_followed_by.count", "followers"],
    following_count: &["followsCount", "edge_follow.count", "following"],
    post_count: &["postsCount", "edge_owner_to_timeline_media.count", "posts"],
    is_verified: &["verified", "is_verified"],
    avatar_url: &["profilePicUrlHD", "profilePicUrl", "profile_pic_url"],
    total_likes: &[],
    total_comments: &[],
    recent_posts: &["latestPosts", "posts"],
    post_likes: &["likesCount", "likes"],
    post_comments: &["commentsCount", "comments"],
};

/// Field bag assembled by the public-page scrape adapter.
static SCRAPED_PAGE: FieldTable = FieldTable {
    username: &["username"],
    display_name: &["displayName"],
    biography: &["biography"],
    follower_count: &["followerCount"],
    following_count: &["followingCount"],
    post_count: &["postCount"],
    is_verified: &["isVerified"],
    avatar_url: &["avatarUrl"],
    total_likes: &["totalLikes"],
    total_comments: &[],
    recent_posts: &[],
    post_likes: &[],
    post_comments: &[],
};

pub(crate) fn table_for(schema: PayloadSchema) -> &'static FieldTable {
    match schema {
        PayloadSchema::TiktokOfficial => &TIKTOK_OFFICIAL,
        PayloadSchema::TiktokProfileJob => &TIKTOK_PROFILE_JOB,
        PayloadSchema::TiktokUserJob => &TIKTOK_USER_JOB,
        PayloadSchema::InstagramJob => &INSTAGRAM_JOB,
        PayloadSchema::ScrapedPage => &SCRAPED_PAGE,
    }
}
