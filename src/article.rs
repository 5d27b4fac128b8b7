//! 文章视图
//!
//! host 聚合器持有的文章在本引擎中的只读投影，外加一个标记已读的控制面。
//! 仅在单次 Hook 调用期间有效，引擎不跨调用保留任何文章状态。

/// 一篇新入库的文章
#[derive(Debug, Clone, Default)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub content: String,
    /// 人类可读的日期串（由 host 渲染）
    pub date: String,
    /// 同一日期的数值时间戳
    pub date_timestamp: i64,
    /// 作者列表，host 已拼接为单个字符串
    pub authors: String,
    /// 标签列表，host 已拼接为单个字符串
    pub tags: String,
    pub feed_name: String,
    /// host 将本条目识别为已见文章的更新
    pub is_updated: bool,
    is_read: bool,
}

impl Article {
    pub fn new<T: Into<String>>(title: T) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_link<T: Into<String>>(mut self, link: T) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_content<T: Into<String>>(mut self, content: T) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_date<T: Into<String>>(mut self, date: T, timestamp: i64) -> Self {
        self.date = date.into();
        self.date_timestamp = timestamp;
        self
    }

    pub fn with_authors<T: Into<String>>(mut self, authors: T) -> Self {
        self.authors = authors.into();
        self
    }

    pub fn with_tags<T: Into<String>>(mut self, tags: T) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn with_feed<T: Into<String>>(mut self, feed_name: T) -> Self {
        self.feed_name = feed_name.into();
        self
    }

    pub fn updated(mut self) -> Self {
        self.is_updated = true;
        self
    }

    /// 请求 host 将该文章标记为已读
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }

    pub fn is_read(&self) -> bool {
        self.is_read
    }
}
