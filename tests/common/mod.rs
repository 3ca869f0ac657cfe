//! 集成测试共用的模拟 CMS

#![allow(dead_code)]

use serde_json::{json, Value};
use spacetraveling::models::config::Config;
use url::Url;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const MASTER_REF: &str = "YF9master";
pub const API_PATH: &str = "/api/v2";
pub const SEARCH_PATH: &str = "/api/v2/documents/search";
pub const TYPE_QUERY: &str = "[[at(document.type,\"posts\")]]";

/// 三篇测试文章：(uid, 标题, 发布时间)
pub const POSTS: [(&str, &str, &str); 3] = [
    ("como-utilizar-hooks", "Como utilizar Hooks", "2021-03-15T19:25:28+0000"),
    ("criando-um-app-cra-do-zero", "Criando um app CRA do zero", "2021-03-25T19:25:28+0000"),
    ("rust-no-frontend", "Rust no frontend", "2021-04-19T10:00:00+0000"),
];

pub fn endpoint(server: &MockServer) -> String {
    format!("{}{}", server.uri(), API_PATH)
}

/// 指向模拟 CMS 的配置
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.cms.endpoint = endpoint(server);
    config.url = Some("https://spacetraveling.dev".to_string());
    config
}

pub fn post_document(uid: &str, title: &str, date: &str) -> Value {
    json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "posts",
        "first_publication_date": date,
        "last_publication_date": date,
        "data": {
            "title": title,
            "subtitle": "Pensando em sincronização em vez de ciclos de vida.",
            "author": "Joseph Oliveira",
            "banner": { "url": "https://images.prismic.io/spacetraveling/banner.png" },
            "content": [{
                "heading": "Proin et varius",
                "body": [
                    { "type": "paragraph", "text": "Lorem ipsum dolor sit amet, consectetur adipiscing elit.", "spans": [
                        { "start": 0, "end": 11, "type": "strong" }
                    ]},
                    { "type": "list-item", "text": "Nullam dolor sapien", "spans": [] }
                ]
            }]
        }
    })
}

/// 第 page 页的游标地址
pub fn page_url(server: &MockServer, page: usize) -> String {
    Url::parse_with_params(
        &format!("{}{}", server.uri(), SEARCH_PATH),
        &[
            ("ref", MASTER_REF.to_string()),
            ("q", TYPE_QUERY.to_string()),
            ("page", page.to_string()),
            ("pageSize", "1".to_string()),
        ],
    )
    .unwrap()
    .to_string()
}

fn search_body(server: &MockServer, page: usize, results: Vec<Value>) -> Value {
    let total = POSTS.len();
    let next_page = if page < total {
        Value::String(page_url(server, page + 1))
    } else {
        Value::Null
    };
    json!({
        "page": page,
        "results_per_page": 1,
        "results_size": results.len(),
        "total_results_size": total,
        "total_pages": total,
        "next_page": next_page,
        "prev_page": null,
        "results": results
    })
}

pub async fn mount_api(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refs": [
                { "id": "master", "ref": MASTER_REF, "label": "Master", "isMasterRef": true }
            ]
        })))
        .mount(server)
        .await;
}

/// 挂载 API 根、按类型分页（每页一篇）以及按 uid 查询
pub async fn mount_cms(server: &MockServer) {
    mount_api(server).await;

    for (i, (uid, title, date)) in POSTS.iter().enumerate() {
        let page = i + 1;
        let body = search_body(server, page, vec![post_document(uid, title, date)]);

        let mock = Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("ref", MASTER_REF))
            .and(query_param("q", TYPE_QUERY));
        let mock = if page == 1 {
            mock.and(query_param_is_missing("page"))
        } else {
            mock.and(query_param("page", page.to_string()))
        };
        mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("q", format!("[[at(my.posts.uid,\"{}\")]]", uid)))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(
                server,
                POSTS.len(),
                vec![post_document(uid, title, date)],
            )))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("q", "[[at(my.posts.uid,\"nao-existe\")]]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(server, POSTS.len(), vec![])))
        .mount(server)
        .await;
}
