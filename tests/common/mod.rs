#![allow(dead_code)]

pub mod fixtures {
    /// Small user service: bearer auth, a `$ref` body in two media types, a
    /// templated path and path-level parameters.
    pub const USERS_SPEC: &str = r##"openapi: 3.1.0
info:
  title: User Service
  version: 1.0.0
servers:
  - url: https://api.example.com/v1/
security:
  - bearerAuth: []
components:
  securitySchemes:
    bearerAuth:
      type: http
      scheme: bearer
  schemas:
    NewUser:
      type: object
      required: [name]
      properties:
        name:
          type: string
    User:
      type: object
      required: [id, name]
      properties:
        id:
          type: integer
        name:
          type: string
paths:
  /users:
    get:
      operationId: listUsers
      summary: List users
      tags: [users]
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
            default: 20
        - name: status
          in: query
          schema:
            type: string
            enum: [active, disabled]
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                type: array
                items:
                  type: object
    post:
      operationId: createUser
      summary: Create a user
      tags: [users]
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/NewUser'
          application/x-www-form-urlencoded:
            schema:
              $ref: '#/components/schemas/NewUser'
      responses:
        '201':
          description: Created
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/User'
              example:
                id: 7
                name: Ada
  /users/{id}:
    parameters:
      - name: id
        in: path
        required: true
        schema:
          type: integer
        example: 42
    get:
      operationId: getUser
      summary: Get a user
      responses:
        '200':
          description: OK
        '404':
          description: Not found
    delete:
      operationId: deleteUser
      security: []
      responses:
        '204':
          description: Deleted
"##;

    /// Added, skipped, modified and removed entries in that order.
    pub const MIXED_DIFF: &str = r#"[
  { "path": "/users", "method": "POST", "kind": "added" },
  { "path": "/widgets", "method": "DELETE", "kind": "modified" },
  {
    "path": "/users",
    "method": "get",
    "kind": "changed",
    "changes": [{ "field": "parameters.limit.default", "before": 10, "after": 20 }]
  },
  {
    "path": "/legacy/{id}",
    "method": "DELETE",
    "kind": "removed",
    "before": {
      "summary": "Delete a legacy record",
      "parameters": [
        { "name": "id", "in": "path", "required": true, "schema": { "type": "string" }, "example": "abc" }
      ],
      "responses": { "204": { "description": "Deleted" } }
    }
  }
]
"#;

    pub const TEXT_DIFF: &str = "\
### New Endpoints: 1
---------------------
POST /users

### Deleted Endpoints: 1
------------------------
DELETE /legacy/{id}

### Modified Endpoints: 1
-------------------------
GET /users
  - Query param status added
";
}

pub mod temp_files {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    /// Write `content` to `dir/name` and return the path.
    pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Every file under `root` keyed by its relative path.
    pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
            for entry in std::fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    walk(root, &path, out);
                } else {
                    let rel = path.strip_prefix(root).unwrap().to_path_buf();
                    out.insert(rel, std::fs::read(&path).unwrap());
                }
            }
        }
        let mut out = BTreeMap::new();
        walk(root, root, &mut out);
        out
    }
}
