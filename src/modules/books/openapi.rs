use serde_json::{json, Value};

fn envelope_of(schema: Value) -> Value {
    json!({
        "type": "object",
        "properties": {
            "message": { "type": "string" },
            "data": schema
        },
        "required": ["message"]
    })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": schema }
        }
    })
}

fn message_response(description: &str) -> Value {
    json_response(
        description,
        json!({ "$ref": "#/components/schemas/MessageEnvelope" }),
    )
}

fn book_response(description: &str) -> Value {
    json_response(
        description,
        envelope_of(json!({ "$ref": "#/components/schemas/Book" })),
    )
}

fn book_list_response(description: &str) -> Value {
    json_response(
        description,
        envelope_of(json!({
            "type": "array",
            "items": { "$ref": "#/components/schemas/Book" }
        })),
    )
}

fn request_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{schema}") }
            }
        }
    })
}

fn id_parameter() -> Value {
    json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    }])
}

/// OpenAPI fragment for the books module; paths are relative to the module
/// mount point.
pub fn fragment() -> Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": book_list_response("Every book in catalog order")
                    }
                },
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": request_body("NewBook"),
                    "responses": {
                        "201": book_response("The created book"),
                        "400": message_response("Malformed request body"),
                        "422": message_response("Missing required fields (strict mapping)"),
                        "500": message_response("Missing required fields (legacy mapping)")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "text/plain": { "schema": { "type": "string" } }
                            }
                        }
                    }
                }
            },
            "/recommendations": {
                "get": {
                    "summary": "Recommended books",
                    "tags": ["Books"],
                    "responses": {
                        "200": book_list_response("The first books in catalog order")
                    }
                }
            },
            "/{id}": {
                "parameters": id_parameter(),
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "responses": {
                        "200": book_response("The book"),
                        "404": message_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Update a book's descriptive fields",
                    "tags": ["Books"],
                    "requestBody": request_body("BookPatch"),
                    "responses": {
                        "200": book_response("The updated book"),
                        "404": message_response("Book not found"),
                        "422": message_response("Blank required field (strict mapping)"),
                        "500": message_response("Blank required field (legacy mapping)")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "responses": {
                        "200": message_response("Book deleted"),
                        "404": message_response("Book not found")
                    }
                }
            },
            "/{id}/borrow": {
                "parameters": id_parameter(),
                "post": {
                    "summary": "Borrow a book",
                    "tags": ["Books"],
                    "requestBody": request_body("BorrowRequest"),
                    "responses": {
                        "200": book_response("The borrowed book with its due date"),
                        "404": message_response("Book not found, or already borrowed (legacy mapping)"),
                        "409": message_response("Book already borrowed (strict mapping)")
                    }
                }
            },
            "/{id}/return": {
                "parameters": id_parameter(),
                "post": {
                    "summary": "Return a borrowed book",
                    "tags": ["Books"],
                    "responses": {
                        "200": message_response("Book returned"),
                        "404": message_response("Book not found, or not borrowed (legacy mapping)"),
                        "409": message_response("Book not borrowed (strict mapping)")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": "string" },
                        "publishedDate": { "type": "string" },
                        "isBorrowed": { "type": "boolean" },
                        "borrowerId": {
                            "type": "string",
                            "description": "Present only while borrowed"
                        },
                        "dueDate": {
                            "type": "string",
                            "format": "date-time",
                            "description": "Present only while borrowed"
                        },
                        "availabilityStatus": {
                            "type": "string",
                            "enum": ["available", "unavailable"]
                        }
                    },
                    "required": ["id", "title", "author", "genre", "isBorrowed", "availabilityStatus"]
                },
                "NewBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": "string" },
                        "publishedDate": { "type": "string" }
                    },
                    "required": ["title", "author", "genre"]
                },
                "BookPatch": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": "string" },
                        "publishedDate": { "type": "string" }
                    }
                },
                "BorrowRequest": {
                    "type": "object",
                    "properties": {
                        "borrowerId": { "type": "string" }
                    },
                    "required": ["borrowerId"]
                }
            }
        }
    })
}
